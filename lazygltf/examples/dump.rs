use lazygltf::{Category, Extensions, Gltf, JsonData, Options, Parser};
use serde_json::json;
use std::path::{Path, PathBuf};

fn load<'a>(parser: &mut Parser, json: &'a Option<JsonData>, path: &Path) -> Gltf<'a> {
    let options = Options::LOAD_GLB_BUFFERS;
    match json {
        Some(json) => {
            let directory = path.parent().unwrap_or(Path::new(""));
            parser
                .load_gltf(json, directory, options)
                .expect("load gltf")
        }
        None => {
            #[cfg(feature = "binary")]
            {
                parser
                    .load_binary_gltf(path, options)
                    .expect("load glb")
            }
            #[cfg(not(feature = "binary"))]
            {
                panic!("Input is .glb but lazygltf was built without feature `binary`.");
            }
        }
    }
}

fn main() {
    env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut categories = Category::ALL;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--scenes-only" => {
                categories = Category::SCENES;
                i += 1;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let path = positional
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./assets/Box.gltf"));
    let is_glb = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("glb"));

    let json = if is_glb {
        None
    } else {
        Some(JsonData::from_path(&path).expect("read json"))
    };

    let mut parser = Parser::new(Extensions::all());
    let mut gltf = load(&mut parser, &json, &path);
    gltf.parse(categories).expect("parse");
    let validation = gltf.validate().err().map(|e| e.to_string());

    let asset = gltf.get_parsed_asset();
    let nodes: Vec<_> = asset
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let trs = node.transform.to_trs();
            json!({
                "index": i,
                "name": node.name,
                "mesh": node.mesh_index,
                "children": node.children,
                "translation": trs.translation,
                "rotation": trs.rotation,
                "scale": trs.scale,
            })
        })
        .collect();

    let out = json!({
        "path": path.display().to_string(),
        "generator": asset.asset_info.as_ref().and_then(|info| info.generator.clone()),
        "extensionsUsed": asset.extensions_used,
        "parsed": format!("{:?}", gltf.parsed_categories()),
        "counts": {
            "buffers": asset.buffers.len(),
            "bufferViews": asset.buffer_views.len(),
            "accessors": asset.accessors.len(),
            "images": asset.images.len(),
            "samplers": asset.samplers.len(),
            "textures": asset.textures.len(),
            "materials": asset.materials.len(),
            "meshes": asset.meshes.len(),
            "skins": asset.skins.len(),
            "cameras": asset.cameras.len(),
            "lights": asset.lights.len(),
            "nodes": asset.nodes.len(),
            "scenes": asset.scenes.len(),
            "animations": asset.animations.len(),
        },
        "defaultScene": asset.default_scene,
        "nodes": nodes,
        "validation": validation.unwrap_or_else(|| "ok".to_string()),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&out).expect("serialize summary")
    );
}
