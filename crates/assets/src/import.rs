//! Metadata importers for the formats the scene ships with.

use crate::store::{AssetError, Model, ModelFormat, Texture};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const FBX_BINARY_MAGIC: &[u8] = b"Kaydara FBX Binary";

/// Import a glTF model from `.gltf` JSON or a `.glb` container.
///
/// Reads mesh, material and animation tables from the document; buffers and
/// accessors are never followed, so the document is not validated against
/// them.
pub fn import_gltf(name: &str, bytes: &[u8]) -> Result<Model, AssetError> {
    let format = if bytes.starts_with(GLB_MAGIC) {
        ModelFormat::Glb
    } else {
        ModelFormat::Gltf
    };
    let gltf = gltf::Gltf::from_slice_without_validation(bytes)
        .map_err(|e| AssetError::GltfParse(format!("{name}: {e}")))?;

    let animations = gltf
        .animations()
        .map(|anim| match anim.name() {
            Some(clip) => clip.to_string(),
            None => format!("clip_{}", anim.index()),
        })
        .collect();

    Ok(Model {
        name: name.to_string(),
        format,
        mesh_count: gltf.meshes().len(),
        material_count: gltf.materials().len(),
        animations,
    })
}

/// Import an FBX character file.
///
/// Only the header and animation presence are read. An FBX file carries its
/// animation in an `AnimationStack`; when present the clip is named after the
/// file, matching how the scene plays the first clip of a character.
pub fn import_fbx(name: &str, bytes: &[u8]) -> Result<Model, AssetError> {
    let is_binary = bytes.starts_with(FBX_BINARY_MAGIC);
    let is_ascii = !is_binary && {
        let head = &bytes[..bytes.len().min(256)];
        String::from_utf8_lossy(head).trim_start().starts_with("; FBX")
    };
    if !is_binary && !is_ascii {
        return Err(AssetError::FbxParse(format!("{name}: not an FBX file")));
    }

    let has_animation = contains(bytes, b"AnimationStack");
    Ok(Model {
        name: name.to_string(),
        format: ModelFormat::Fbx,
        mesh_count: count_occurrences(bytes, b"Geometry::"),
        material_count: count_occurrences(bytes, b"Material::"),
        animations: if has_animation {
            vec![name.to_string()]
        } else {
            Vec::new()
        },
    })
}

/// Decode an image far enough to learn its dimensions.
pub fn import_texture(name: &str, bytes: &[u8]) -> Result<Texture, AssetError> {
    let image = image::load_from_memory(bytes)?;
    Ok(Texture {
        name: name.to_string(),
        width: image.width(),
        height: image.height(),
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}
