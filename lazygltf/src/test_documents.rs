use crate::JsonData;

/// One textured triangle: 3 float positions and 3 u16 indices in an embedded 44-byte buffer.
pub(crate) const TRIANGLE: &str = r#"
{
  "asset": { "version": "2.0", "generator": "lazygltf tests" },
  "scene": 0,
  "scenes": [{ "name": "Scene", "nodes": [0] }],
  "nodes": [
    {
      "name": "Root",
      "children": [1],
      "matrix": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 5, 0, 0, 1]
    },
    { "name": "Triangle", "mesh": 0, "translation": [1, 2, 3] }
  ],
  "meshes": [
    {
      "name": "Triangle",
      "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
    }
  ],
  "materials": [
    {
      "name": "Red",
      "pbrMetallicRoughness": {
        "baseColorFactor": [1, 0, 0, 1],
        "baseColorTexture": { "index": 0 }
      }
    }
  ],
  "textures": [{ "sampler": 0, "source": 0 }],
  "images": [{ "uri": "data:image/png;base64,iVBORw0KGgo=" }],
  "samplers": [{ "magFilter": 9729, "minFilter": 9987, "wrapS": 33071 }],
  "accessors": [
    {
      "bufferView": 0,
      "componentType": 5126,
      "count": 3,
      "type": "VEC3",
      "min": [0, 0, 0],
      "max": [1, 1, 0]
    },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
  ],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
  ],
  "buffers": [
    {
      "byteLength": 44,
      "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
    }
  ]
}
"#;

/// Skinned, animated mesh with two cameras and punctual lights; the buffer is an
/// external `rig.bin` that never has to exist.
pub(crate) const RIG: &str = r#"
{
  "asset": { "version": "2.0" },
  "extensionsUsed": ["KHR_lights_punctual"],
  "extensions": {
    "KHR_lights_punctual": {
      "lights": [
        {
          "name": "Spot",
          "type": "spot",
          "color": [1, 0.5, 0],
          "intensity": 3,
          "spot": { "innerConeAngle": 0.2, "outerConeAngle": 0.6 }
        },
        { "type": "point", "range": 10 }
      ]
    }
  },
  "scene": 0,
  "scenes": [{ "nodes": [0, 2] }],
  "nodes": [
    { "name": "Body", "mesh": 0, "skin": 0 },
    { "name": "Joint", "rotation": [0, 0, 0.70710677, 0.70710677] },
    {
      "name": "Eye",
      "camera": 0,
      "children": [1],
      "extensions": { "KHR_lights_punctual": { "light": 0 } }
    }
  ],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
  "skins": [{ "name": "Skin", "inverseBindMatrices": 1, "joints": [1], "skeleton": 2 }],
  "animations": [
    {
      "name": "Spin",
      "channels": [{ "sampler": 0, "target": { "node": 1, "path": "rotation" } }],
      "samplers": [{ "input": 2, "output": 3, "interpolation": "LINEAR" }]
    }
  ],
  "cameras": [
    {
      "name": "Perspective",
      "type": "perspective",
      "perspective": { "aspectRatio": 1.5, "yfov": 0.66, "znear": 0.01, "zfar": 100 }
    },
    {
      "type": "orthographic",
      "orthographic": { "xmag": 2, "ymag": 1, "znear": 0.01, "zfar": 50 }
    }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
    { "bufferView": 1, "componentType": 5126, "count": 1, "type": "MAT4" },
    { "bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR" },
    { "bufferView": 3, "componentType": 5126, "count": 2, "type": "VEC4" }
  ],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 64 },
    { "buffer": 0, "byteOffset": 100, "byteLength": 8 },
    { "buffer": 0, "byteOffset": 108, "byteLength": 32 }
  ],
  "buffers": [{ "uri": "rig.bin", "byteLength": 256 }]
}
"#;

pub(crate) fn json(source: &str) -> JsonData {
    JsonData::from_str(source).expect("test document parses")
}
