use crate::test_documents::{RIG, TRIANGLE, json};
use crate::{
    AccessorType, AlphaMode, AnimationInterpolation, AnimationPath, BufferTarget, CameraProjection,
    Category, ComponentType, DataSource, Error, Extensions, Filter, JsonData, LightType, MimeType,
    NodeTransform, Options, Parser, PrimitiveType, Trs, Wrap,
};
use std::path::Path;

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1e-6,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

#[test]
fn empty_document_has_no_valid_asset_field() {
    let doc = json("{}");
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");

    assert_eq!(
        gltf.parse(Category::ALL),
        Err(Error::InvalidOrMissingAssetField)
    );
    assert!(gltf.parsed_categories().is_empty());
    assert!(gltf.get_parsed_asset().nodes.is_empty());
}

#[test]
fn unsupported_asset_version_is_rejected() {
    for asset in [
        r#"{ "asset": { "version": "1.0" } }"#,
        r#"{ "asset": { "version": "2" } }"#,
        r#"{ "asset": { "generator": "no version" } }"#,
        r#"{ "asset": "2.0" }"#,
    ] {
        let doc = json(asset);
        let mut parser = Parser::default();
        let mut gltf = parser
            .load_gltf(&doc, "", Options::empty())
            .expect("load");
        assert_eq!(
            gltf.parse(Category::ALL),
            Err(Error::InvalidOrMissingAssetField),
            "{asset}"
        );
    }
}

#[test]
fn asset_field_can_be_waived() {
    let doc = json(r#"{ "nodes": [{ "name": "Lonely" }] }"#);
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::DONT_REQUIRE_VALID_ASSET_MEMBER)
        .expect("load");

    gltf.parse(Category::ALL).expect("parse");
    let asset = gltf.get_parsed_asset();
    assert_eq!(asset.asset_info, None);
    assert_eq!(asset.nodes.len(), 1);
    assert_eq!(asset.nodes[0].name.as_deref(), Some("Lonely"));
}

#[test]
fn required_extensions_must_be_enabled_for_every_mask() {
    let doc = json(
        r#"{
          "asset": { "version": "2.0" },
          "extensionsUsed": ["KHR_texture_basisu"],
          "extensionsRequired": ["KHR_texture_basisu"]
        }"#,
    );

    for mask in [
        Category::empty(),
        Category::BUFFERS,
        Category::SCENES,
        Category::ALL,
    ] {
        let mut parser = Parser::new(Extensions::KHR_TEXTURE_TRANSFORM);
        let mut gltf = parser
            .load_gltf(&doc, "", Options::empty())
            .expect("load");
        assert_eq!(
            gltf.parse(mask),
            Err(Error::MissingExtensions {
                extensions: vec!["KHR_texture_basisu".to_string()],
            }),
            "{mask:?}"
        );
        assert!(gltf.parsed_categories().is_empty());
    }

    let mut parser = Parser::new(Extensions::KHR_TEXTURE_BASISU);
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    gltf.parse(Category::ALL).expect("basisu enabled");
    assert_eq!(
        gltf.get_parsed_asset().extensions_required,
        vec!["KHR_texture_basisu".to_string()]
    );
}

#[test]
fn unknown_required_extension_is_never_supported() {
    let doc = json(
        r#"{
          "asset": { "version": "2.0" },
          "extensionsRequired": ["EXT_meshopt_compression", "KHR_lights_punctual"]
        }"#,
    );
    let mut parser = Parser::new(Extensions::all());
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    assert_eq!(
        gltf.parse(Category::NODES),
        Err(Error::MissingExtensions {
            extensions: vec!["EXT_meshopt_compression".to_string()],
        })
    );
}

#[test]
fn category_dependencies_are_transitive() {
    assert_eq!(Category::CAMERAS.with_dependencies(), Category::CAMERAS);
    assert_eq!(
        Category::TEXTURES.with_dependencies(),
        Category::TEXTURES
            | Category::IMAGES
            | Category::SAMPLERS
            | Category::BUFFER_VIEWS
            | Category::BUFFERS
    );
    assert_eq!(
        Category::ANIMATIONS.with_dependencies(),
        Category::ANIMATIONS | Category::ACCESSORS | Category::BUFFER_VIEWS | Category::BUFFERS
    );
    assert_eq!(
        Category::SCENES.with_dependencies(),
        Category::ALL - Category::ANIMATIONS
    );
    assert_eq!(Category::ALL.with_dependencies(), Category::ALL);
}

#[test]
fn categories_parse_incrementally() {
    let doc = json(TRIANGLE);
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");

    gltf.parse(Category::SAMPLERS).expect("samplers");
    assert_eq!(gltf.parsed_categories(), Category::SAMPLERS);
    assert_eq!(gltf.get_parsed_asset().samplers.len(), 1);
    assert!(gltf.get_parsed_asset().nodes.is_empty());
    assert!(gltf.get_parsed_asset().materials.is_empty());

    gltf.parse(Category::SCENES).expect("scenes");
    let scenes = gltf.get_parsed_asset().scenes.clone();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].node_indices, vec![0]);
    assert_eq!(gltf.get_parsed_asset().nodes.len(), 2);

    gltf.parse(Category::MATERIALS).expect("materials");
    let asset = gltf.get_parsed_asset();
    assert_eq!(asset.scenes, scenes);
    assert_eq!(asset.materials.len(), 1);
    assert_eq!(asset.materials[0].name.as_deref(), Some("Red"));
    assert!(gltf.parsed_categories().contains(Category::SCENES | Category::MATERIALS));
}

#[test]
fn failed_parse_keeps_earlier_categories() {
    let doc = json(
        r#"{
          "asset": { "version": "2.0" },
          "samplers": [{ "magFilter": 9728 }],
          "meshes": [{ "name": "Broken" }]
        }"#,
    );
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");

    gltf.parse(Category::SAMPLERS).expect("samplers");
    assert_eq!(
        gltf.parse(Category::MESHES),
        Err(Error::InvalidOrMissingRequiredField {
            context: "meshes[0]".to_string(),
            field: "primitives".to_string(),
        })
    );
    assert_eq!(gltf.get_parsed_asset().samplers.len(), 1);
    assert_eq!(
        gltf.get_parsed_asset().samplers[0].mag_filter,
        Some(Filter::Nearest)
    );
    assert!(gltf.parsed_categories().contains(Category::SAMPLERS));
    assert!(!gltf.parsed_categories().contains(Category::MESHES));
}

#[test]
fn malformed_default_scene_only_fails_scenes() {
    let doc = json(
        r#"{
          "asset": { "version": "2.0" },
          "scene": "zero",
          "scenes": [{ "nodes": [] }],
          "samplers": [{ "magFilter": 9728 }]
        }"#,
    );
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");

    gltf.parse(Category::SAMPLERS).expect("samplers ignore the default scene");
    assert_eq!(
        gltf.get_parsed_asset().samplers[0].mag_filter,
        Some(Filter::Nearest)
    );
    assert_eq!(gltf.get_parsed_asset().default_scene, None);

    assert!(matches!(
        gltf.parse(Category::SCENES),
        Err(Error::InvalidGltf { context, .. }) if context == "scene"
    ));
    assert!(!gltf.parsed_categories().contains(Category::SCENES));
    assert!(gltf.get_parsed_asset().scenes.is_empty());
    assert!(gltf.parsed_categories().contains(Category::SAMPLERS));
}

#[test]
fn ignored_extensions_are_recorded_once() {
    let doc = json(
        r#"{
          "asset": { "version": "2.0" },
          "extensionsUsed": [
            "KHR_lights_punctual",
            "KHR_draco_mesh_compression",
            "KHR_texture_transform"
          ],
          "samplers": [{ "magFilter": 1 }]
        }"#,
    );
    let mut parser = Parser::new(Extensions::KHR_TEXTURE_TRANSFORM);
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    assert!(gltf.ignored_extensions().is_empty());

    let expected = [
        "KHR_lights_punctual".to_string(),
        "KHR_draco_mesh_compression".to_string(),
    ];
    assert!(gltf.parse(Category::SAMPLERS).is_err());
    assert_eq!(gltf.ignored_extensions(), &expected);
    assert!(gltf.parse(Category::SAMPLERS).is_err());
    assert_eq!(gltf.ignored_extensions(), &expected);
}

#[test]
fn triangle_document_is_fully_typed() {
    let doc = json(TRIANGLE);
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    gltf.parse(Category::ALL).expect("parse");
    let asset = gltf.get_parsed_asset();

    let info = asset.asset_info.as_ref().expect("asset info");
    assert_eq!(info.version, "2.0");
    assert_eq!(info.generator.as_deref(), Some("lazygltf tests"));
    assert_eq!(asset.default_scene, Some(0));

    assert!(asset.nodes[0].has_matrix());
    assert_eq!(asset.nodes[0].children, vec![1]);
    assert!(!asset.nodes[1].has_matrix());
    assert_eq!(
        asset.nodes[1].transform,
        NodeTransform::Trs(Trs {
            translation: [1.0, 2.0, 3.0],
            ..Trs::default()
        })
    );
    assert_eq!(asset.nodes[1].mesh_index, Some(0));

    let primitive = &asset.meshes[0].primitives[0];
    assert_eq!(primitive.attribute("POSITION"), Some(0));
    assert_eq!(primitive.attribute("NORMAL"), None);
    assert_eq!(primitive.indices_accessor, Some(1));
    assert_eq!(primitive.material_index, Some(0));
    assert_eq!(primitive.mode, PrimitiveType::Triangles);

    assert_eq!(asset.accessors[0].accessor_type, AccessorType::Vec3);
    assert_eq!(asset.accessors[0].component_type, ComponentType::Float);
    assert_eq!(asset.accessors[0].max, Some(vec![1.0, 1.0, 0.0]));
    assert_eq!(asset.accessors[1].component_type, ComponentType::UnsignedShort);
    assert_eq!(asset.accessors[1].buffer_view_index, Some(1));

    assert_eq!(asset.buffer_views[0].target, Some(BufferTarget::ArrayBuffer));
    assert_eq!(asset.buffer_views[1].byte_offset, 36);
    assert_eq!(
        asset.buffer_views[1].target,
        Some(BufferTarget::ElementArrayBuffer)
    );

    let sampler = &asset.samplers[0];
    assert_eq!(sampler.mag_filter, Some(Filter::Linear));
    assert_eq!(sampler.min_filter, Some(Filter::LinearMipMapLinear));
    assert_eq!(sampler.wrap_s, Wrap::ClampToEdge);
    assert_eq!(sampler.wrap_t, Wrap::Repeat);

    assert_eq!(asset.textures[0].image_index, Some(0));
    assert_eq!(asset.textures[0].fallback_image_index, None);
    assert_eq!(asset.textures[0].sampler_index, Some(0));

    let material = &asset.materials[0];
    let pbr = material.pbr_data.as_ref().expect("pbr");
    assert_eq!(pbr.base_color_factor, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(pbr.metallic_factor, 1.0);
    assert_eq!(
        pbr.base_color_texture.as_ref().map(|t| t.texture_index),
        Some(0)
    );
    assert_eq!(material.alpha_mode, AlphaMode::Opaque);
    assert_eq!(material.alpha_cutoff, 0.5);
    assert!(!material.double_sided);
    assert_eq!(material.texture_infos().count(), 1);

    match &asset.images[0].data {
        DataSource::Vector { bytes, mime_type } => {
            assert_eq!(*mime_type, MimeType::Png);
            assert_eq!(bytes.as_slice(), b"\x89PNG\r\n\x1a\n");
        }
        other => panic!("unexpected image source {other:?}"),
    }
    assert_eq!(asset.buffers[0].byte_length, 44);
    match &asset.buffers[0].data {
        DataSource::Vector { bytes, mime_type } => {
            assert_eq!(*mime_type, MimeType::OctetStream);
            assert_eq!(bytes.len(), 44);
        }
        other => panic!("unexpected buffer source {other:?}"),
    }

    gltf.validate().expect("triangle validates");
}

#[test]
fn decompose_option_turns_matrices_into_trs() {
    let doc = json(TRIANGLE);
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::DECOMPOSE_NODE_MATRICES)
        .expect("load");
    gltf.parse(Category::NODES).expect("parse");

    let node = &gltf.get_parsed_asset().nodes[0];
    assert!(!node.has_matrix());
    assert_eq!(
        node.transform,
        NodeTransform::Trs(Trs {
            translation: [5.0, 0.0, 0.0],
            ..Trs::default()
        })
    );
}

#[test]
fn matrix_wins_when_a_node_has_both_forms() {
    let doc = json(
        r#"{
          "asset": { "version": "2.0" },
          "nodes": [{
            "matrix": [2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1],
            "translation": [9, 9, 9]
          }]
        }"#,
    );
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    gltf.parse(Category::NODES).expect("parse");

    match gltf.get_parsed_asset().nodes[0].transform {
        NodeTransform::Matrix(matrix) => {
            assert_eq!(matrix[0], 2.0);
            assert_eq!(matrix[12], 0.0);
        }
        NodeTransform::Trs(trs) => panic!("expected matrix, got {trs:?}"),
    }
}

#[test]
fn component_type_codes_are_checked() {
    let document = |code: u32| {
        json(&format!(
            r#"{{
              "asset": {{ "version": "2.0" }},
              "accessors": [{{ "componentType": {code}, "count": 1, "type": "SCALAR" }}]
            }}"#
        ))
    };

    let doc = document(5130);
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    assert!(matches!(
        gltf.parse(Category::ACCESSORS),
        Err(Error::InvalidGltf { ref context, .. }) if context == "accessors[0]"
    ));

    let mut gltf = parser
        .load_gltf(&doc, "", Options::ALLOW_DOUBLE)
        .expect("load");
    gltf.parse(Category::ACCESSORS).expect("double allowed");
    assert_eq!(
        gltf.get_parsed_asset().accessors[0].component_type,
        ComponentType::Double
    );
    assert_eq!(gltf.get_parsed_asset().accessors[0].buffer_view_index, None);

    let doc = document(5131);
    let mut gltf = parser
        .load_gltf(&doc, "", Options::ALLOW_DOUBLE)
        .expect("load");
    assert!(matches!(
        gltf.parse(Category::ACCESSORS),
        Err(Error::InvalidGltf { .. })
    ));
}

#[test]
fn missing_required_field_names_the_field() {
    let doc = json(
        r#"{
          "asset": { "version": "2.0" },
          "buffers": [{ "byteLength": 4, "uri": "data:application/octet-stream;base64,AAAAAA==" }],
          "bufferViews": [{ "buffer": 0 }]
        }"#,
    );
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    assert_eq!(
        gltf.parse(Category::BUFFER_VIEWS),
        Err(Error::InvalidOrMissingRequiredField {
            context: "bufferViews[0]".to_string(),
            field: "byteLength".to_string(),
        })
    );
    assert!(gltf.parsed_categories().contains(Category::BUFFERS));
}

#[test]
fn wrong_json_types_are_invalid_gltf() {
    let doc = json(
        r#"{
          "asset": { "version": "2.0" },
          "nodes": [{ "mesh": "zero" }]
        }"#,
    );
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    assert!(matches!(
        gltf.parse(Category::NODES),
        Err(Error::InvalidGltf { ref context, .. }) if context == "nodes[0]"
    ));
}

#[test]
fn rig_document_has_skins_animations_cameras_and_lights() {
    let doc = json(RIG);
    let mut parser = Parser::new(Extensions::KHR_LIGHTS_PUNCTUAL);
    let mut gltf = parser
        .load_gltf(&doc, "assets", Options::empty())
        .expect("load");
    gltf.parse(Category::ALL).expect("parse");
    let asset = gltf.get_parsed_asset();

    let skin = &asset.skins[0];
    assert_eq!(skin.name.as_deref(), Some("Skin"));
    assert_eq!(skin.joints, vec![1]);
    assert_eq!(skin.inverse_bind_matrices, Some(1));
    assert_eq!(skin.skeleton, Some(2));
    assert_eq!(asset.nodes[0].skin_index, Some(0));
    assert_eq!(asset.accessors[1].accessor_type, AccessorType::Mat4);

    let animation = &asset.animations[0];
    assert_eq!(animation.name.as_deref(), Some("Spin"));
    assert_eq!(animation.channels[0].sampler_index, 0);
    assert_eq!(animation.channels[0].node_index, Some(1));
    assert_eq!(animation.channels[0].path, AnimationPath::Rotation);
    assert_eq!(animation.samplers[0].input_accessor, 2);
    assert_eq!(animation.samplers[0].output_accessor, 3);
    assert_eq!(
        animation.samplers[0].interpolation,
        AnimationInterpolation::Linear
    );

    match asset.cameras[0].projection {
        CameraProjection::Perspective {
            aspect_ratio,
            yfov,
            zfar,
            znear,
        } => {
            assert_eq!(aspect_ratio, Some(1.5));
            assert_approx(yfov, 0.66);
            assert_eq!(zfar, Some(100.0));
            assert_approx(znear, 0.01);
        }
        other => panic!("expected perspective, got {other:?}"),
    }
    assert_eq!(
        asset.cameras[1].projection,
        CameraProjection::Orthographic {
            xmag: 2.0,
            ymag: 1.0,
            zfar: 50.0,
            znear: 0.01,
        }
    );
    assert_eq!(asset.nodes[2].camera_index, Some(0));

    assert_eq!(asset.lights.len(), 2);
    assert_eq!(asset.lights[0].name.as_deref(), Some("Spot"));
    assert_eq!(asset.lights[0].color, [1.0, 0.5, 0.0]);
    assert_eq!(asset.lights[0].intensity, 3.0);
    assert_eq!(
        asset.lights[0].light_type,
        LightType::Spot {
            inner_cone_angle: 0.2,
            outer_cone_angle: 0.6,
        }
    );
    assert_eq!(asset.lights[1].light_type, LightType::Point);
    assert_eq!(asset.lights[1].intensity, 1.0);
    assert_eq!(asset.lights[1].range, Some(10.0));
    assert_eq!(asset.nodes[2].light_index, Some(0));

    assert_eq!(
        asset.buffers[0].data,
        DataSource::FilePath {
            path: Path::new("assets").join("rig.bin"),
            file_byte_offset: 0,
            byte_length: Some(256),
            mime_type: MimeType::OctetStream,
        }
    );

    gltf.validate().expect("rig validates");
}

#[test]
fn nodes_pull_in_skins_but_not_animations() {
    let doc = json(RIG);
    let mut parser = Parser::new(Extensions::KHR_LIGHTS_PUNCTUAL);
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    gltf.parse(Category::NODES).expect("parse");

    let asset = gltf.get_parsed_asset();
    assert_eq!(asset.nodes[0].skin_index, Some(0));
    assert_eq!(asset.skins.len(), 1);
    assert_eq!(asset.cameras.len(), 2);
    assert!(asset.animations.is_empty());
    assert!(asset.scenes.is_empty());
    assert!(!gltf.parsed_categories().contains(Category::ANIMATIONS));
}

#[test]
fn used_but_disabled_extensions_are_skipped() {
    let doc = json(RIG);
    let mut parser = Parser::new(Extensions::empty());
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    gltf.parse(Category::ALL).expect("parse");

    let asset = gltf.get_parsed_asset();
    assert_eq!(asset.extensions_used, vec!["KHR_lights_punctual".to_string()]);
    assert!(asset.lights.is_empty());
    assert_eq!(asset.nodes[2].light_index, None);
    gltf.validate().expect("validates without lights");
}

#[test]
fn parsing_twice_is_idempotent() {
    let doc = json(TRIANGLE);
    let mut parser = Parser::default();
    let mut gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    gltf.parse(Category::ALL).expect("first");
    let nodes = gltf.get_parsed_asset().nodes.clone();
    gltf.parse(Category::ALL).expect("second");
    assert_eq!(gltf.get_parsed_asset().nodes, nodes);
}

#[test]
fn validate_needs_a_parsed_category() {
    let doc = json(TRIANGLE);
    let mut parser = Parser::default();
    let gltf = parser
        .load_gltf(&doc, "", Options::empty())
        .expect("load");
    assert_eq!(gltf.validate(), Err(Error::NothingParsed));
}

#[test]
fn load_errors_are_kept_until_the_next_load() {
    let array = json("[1, 2, 3]");
    let object = json(TRIANGLE);
    let mut parser = Parser::default();

    assert!(matches!(
        parser.load_gltf(&array, "", Options::empty()),
        Err(Error::InvalidJson { .. })
    ));
    assert!(matches!(parser.error(), Some(Error::InvalidJson { .. })));

    parser
        .load_gltf(&object, "", Options::empty())
        .expect("load");
    assert_eq!(parser.error(), None);
}

#[test]
fn json_text_is_checked_and_bom_is_skipped() {
    assert!(matches!(
        JsonData::from_str("{ \"asset\": "),
        Err(Error::InvalidJson { .. })
    ));
    let doc = JsonData::from_slice(b"\xEF\xBB\xBF{ \"asset\": { \"version\": \"2.0\" } }")
        .expect("bom is skipped");
    assert!(doc.root().is_object());

    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.gltf");
    assert_eq!(
        JsonData::from_path(&missing).err(),
        Some(Error::FileNotFound { path: missing })
    );
}
