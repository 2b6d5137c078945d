//! Whole-graph referential checks over everything parsed so far.
//!
//! References into a category that has not been parsed yet are skipped; the categories
//! a parse pulls in through dependencies are always checked.

use crate::{
    Accessor, Animation, Asset, Buffer, BufferView, Camera, CameraProjection, Category,
    DataSource, Error, Image, Light, LightType, Material, Mesh, Node, Scene, Skin, Texture,
    element_byte_size,
};

fn check_index(context: &str, field: &str, index: usize, len: usize) -> Result<(), Error> {
    if index < len {
        Ok(())
    } else {
        Err(Error::out_of_range(context, field, index, len))
    }
}

fn check_optional(
    context: &str,
    field: &str,
    index: Option<usize>,
    len: usize,
) -> Result<(), Error> {
    match index {
        Some(index) => check_index(context, field, index, len),
        None => Ok(()),
    }
}

pub(crate) fn validate(asset: &Asset, parsed: Category) -> Result<(), Error> {
    if parsed.contains(Category::SCENES) {
        check_optional("asset", "scene", asset.default_scene, asset.scenes.len())?;
    }

    for (index, buffer) in asset.buffers.iter().enumerate() {
        validate_buffer(&format!("buffers[{index}]"), buffer)?;
    }
    for (index, view) in asset.buffer_views.iter().enumerate() {
        validate_buffer_view(&format!("bufferViews[{index}]"), view, asset)?;
    }
    for (index, accessor) in asset.accessors.iter().enumerate() {
        validate_accessor(&format!("accessors[{index}]"), accessor, asset)?;
    }
    for (index, image) in asset.images.iter().enumerate() {
        validate_image(&format!("images[{index}]"), image, asset)?;
    }
    for (index, texture) in asset.textures.iter().enumerate() {
        validate_texture(&format!("textures[{index}]"), texture, asset)?;
    }
    for (index, material) in asset.materials.iter().enumerate() {
        validate_material(&format!("materials[{index}]"), material, asset)?;
    }
    for (index, mesh) in asset.meshes.iter().enumerate() {
        validate_mesh(&format!("meshes[{index}]"), mesh, asset)?;
    }
    let nodes_parsed = parsed.contains(Category::NODES);
    for (index, skin) in asset.skins.iter().enumerate() {
        validate_skin(&format!("skins[{index}]"), skin, asset, nodes_parsed)?;
    }
    for (index, camera) in asset.cameras.iter().enumerate() {
        validate_camera(&format!("cameras[{index}]"), camera)?;
    }
    for (index, light) in asset.lights.iter().enumerate() {
        validate_light(&format!("lights[{index}]"), light)?;
    }
    for (index, node) in asset.nodes.iter().enumerate() {
        validate_node(&format!("nodes[{index}]"), index, node, asset)?;
    }
    for (index, scene) in asset.scenes.iter().enumerate() {
        validate_scene(&format!("scenes[{index}]"), scene, asset)?;
    }
    for (index, animation) in asset.animations.iter().enumerate() {
        validate_animation(
            &format!("animations[{index}]"),
            animation,
            asset,
            nodes_parsed,
        )?;
    }
    Ok(())
}

fn validate_buffer(context: &str, buffer: &Buffer) -> Result<(), Error> {
    if buffer.byte_length < 1 {
        return Err(Error::invalid(context, "byteLength must be at least 1"));
    }
    Ok(())
}

fn validate_buffer_view(context: &str, view: &BufferView, asset: &Asset) -> Result<(), Error> {
    check_index(context, "buffer", view.buffer_index, asset.buffers.len())?;
    let buffer = &asset.buffers[view.buffer_index];
    let end = view.byte_offset.checked_add(view.byte_length);
    if end.is_none_or(|end| end > buffer.byte_length) {
        return Err(Error::invalid(
            context,
            format!(
                "range {}+{} exceeds buffer {} of {} bytes",
                view.byte_offset, view.byte_length, view.buffer_index, buffer.byte_length
            ),
        ));
    }
    if let Some(stride) = view.byte_stride {
        if !(4..=252).contains(&stride) || stride % 4 != 0 {
            return Err(Error::invalid(
                context,
                format!("byteStride {stride} must be a multiple of 4 in 4..=252"),
            ));
        }
    }
    Ok(())
}

fn validate_accessor(context: &str, accessor: &Accessor, asset: &Asset) -> Result<(), Error> {
    let element_size = element_byte_size(accessor.accessor_type, accessor.component_type) as u64;
    if element_size == 0 {
        return Err(Error::invalid(context, "element byte size is zero"));
    }
    if let Some(view_index) = accessor.buffer_view_index {
        check_index(context, "bufferView", view_index, asset.buffer_views.len())?;
        let view = &asset.buffer_views[view_index];
        if accessor.count > 0 && accessor.byte_offset.saturating_add(element_size) > view.byte_length {
            return Err(Error::invalid(
                context,
                format!(
                    "first element at offset {} does not fit in buffer view {view_index} of {} bytes",
                    accessor.byte_offset, view.byte_length
                ),
            ));
        }
    }
    if let Some(sparse) = &accessor.sparse {
        let views = asset.buffer_views.len();
        check_index(context, "sparse.indices.bufferView", sparse.indices_buffer_view, views)?;
        check_index(context, "sparse.values.bufferView", sparse.values_buffer_view, views)?;
    }
    Ok(())
}

fn validate_image(context: &str, image: &Image, asset: &Asset) -> Result<(), Error> {
    if let DataSource::BufferView { buffer_view, .. } = &image.data {
        check_index(context, "bufferView", *buffer_view, asset.buffer_views.len())?;
    }
    Ok(())
}

fn validate_texture(context: &str, texture: &Texture, asset: &Asset) -> Result<(), Error> {
    let images = asset.images.len();
    check_optional(context, "source", texture.image_index, images)?;
    check_optional(context, "fallback source", texture.fallback_image_index, images)?;
    check_optional(context, "sampler", texture.sampler_index, asset.samplers.len())
}

fn validate_material(context: &str, material: &Material, asset: &Asset) -> Result<(), Error> {
    for (slot, info) in material.texture_infos() {
        check_index(
            context,
            &format!("{slot}.index"),
            info.texture_index,
            asset.textures.len(),
        )?;
    }
    Ok(())
}

fn validate_mesh(context: &str, mesh: &Mesh, asset: &Asset) -> Result<(), Error> {
    if mesh.primitives.is_empty() {
        return Err(Error::invalid(context, "mesh has no primitives"));
    }
    let accessors = asset.accessors.len();
    for (index, primitive) in mesh.primitives.iter().enumerate() {
        let context = format!("{context}.primitives[{index}]");
        for (semantic, accessor) in &primitive.attributes {
            check_index(&context, semantic, *accessor, accessors)?;
        }
        check_optional(&context, "indices", primitive.indices_accessor, accessors)?;
        check_optional(
            &context,
            "material",
            primitive.material_index,
            asset.materials.len(),
        )?;
        for target in &primitive.targets {
            for (semantic, accessor) in target {
                check_index(&context, &format!("targets.{semantic}"), *accessor, accessors)?;
            }
        }
    }
    Ok(())
}

fn validate_skin(
    context: &str,
    skin: &Skin,
    asset: &Asset,
    nodes_parsed: bool,
) -> Result<(), Error> {
    check_optional(
        context,
        "inverseBindMatrices",
        skin.inverse_bind_matrices,
        asset.accessors.len(),
    )?;
    if nodes_parsed {
        for joint in &skin.joints {
            check_index(context, "joints", *joint, asset.nodes.len())?;
        }
        check_optional(context, "skeleton", skin.skeleton, asset.nodes.len())?;
    }
    Ok(())
}

fn validate_camera(context: &str, camera: &Camera) -> Result<(), Error> {
    match camera.projection {
        CameraProjection::Perspective {
            yfov, zfar, znear, ..
        } => {
            if znear <= 0.0 {
                return Err(Error::invalid(context, "znear must be greater than zero"));
            }
            if zfar.is_some_and(|zfar| zfar <= znear) {
                return Err(Error::invalid(context, "zfar must be greater than znear"));
            }
            if yfov <= 0.0 {
                return Err(Error::invalid(context, "yfov must be greater than zero"));
            }
        }
        CameraProjection::Orthographic {
            xmag,
            ymag,
            zfar,
            znear,
        } => {
            if znear < 0.0 {
                return Err(Error::invalid(context, "znear must not be negative"));
            }
            if zfar <= znear {
                return Err(Error::invalid(context, "zfar must be greater than znear"));
            }
            if xmag == 0.0 || ymag == 0.0 {
                return Err(Error::invalid(context, "xmag and ymag must be nonzero"));
            }
        }
    }
    Ok(())
}

fn validate_light(context: &str, light: &Light) -> Result<(), Error> {
    if light.range.is_some_and(|range| range <= 0.0) {
        return Err(Error::invalid(context, "range must be greater than zero"));
    }
    if let LightType::Spot {
        inner_cone_angle,
        outer_cone_angle,
    } = light.light_type
    {
        if inner_cone_angle < 0.0
            || inner_cone_angle >= outer_cone_angle
            || outer_cone_angle > std::f32::consts::FRAC_PI_2
        {
            return Err(Error::invalid(
                context,
                "spot cone angles must satisfy 0 <= inner < outer <= pi/2",
            ));
        }
    }
    Ok(())
}

fn validate_node(context: &str, index: usize, node: &Node, asset: &Asset) -> Result<(), Error> {
    check_optional(context, "mesh", node.mesh_index, asset.meshes.len())?;
    check_optional(context, "skin", node.skin_index, asset.skins.len())?;
    check_optional(context, "camera", node.camera_index, asset.cameras.len())?;
    check_optional(context, "light", node.light_index, asset.lights.len())?;
    for child in &node.children {
        check_index(context, "children", *child, asset.nodes.len())?;
        if *child == index {
            return Err(Error::invalid(context, "node lists itself as a child"));
        }
    }
    if node.skin_index.is_some() && node.mesh_index.is_none() {
        return Err(Error::invalid(context, "skinned node has no mesh"));
    }
    Ok(())
}

fn validate_scene(context: &str, scene: &Scene, asset: &Asset) -> Result<(), Error> {
    for node in &scene.node_indices {
        check_index(context, "nodes", *node, asset.nodes.len())?;
    }
    Ok(())
}

fn validate_animation(
    context: &str,
    animation: &Animation,
    asset: &Asset,
    nodes_parsed: bool,
) -> Result<(), Error> {
    for (index, channel) in animation.channels.iter().enumerate() {
        let context = format!("{context}.channels[{index}]");
        check_index(
            &context,
            "sampler",
            channel.sampler_index,
            animation.samplers.len(),
        )?;
        if nodes_parsed {
            check_optional(&context, "target.node", channel.node_index, asset.nodes.len())?;
        }
    }
    for (index, sampler) in animation.samplers.iter().enumerate() {
        let context = format!("{context}.samplers[{index}]");
        check_index(&context, "input", sampler.input_accessor, asset.accessors.len())?;
        check_index(&context, "output", sampler.output_accessor, asset.accessors.len())?;
    }
    Ok(())
}
