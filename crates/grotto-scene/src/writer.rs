//! Text serialization of a [`CaveScene`].
//!
//! Layout, in order: the `mtllib` line, every `v` record, every `ng` record,
//! the `camera` and `ld` records, then one `usemtl` block per material.
//! Positions are multiplied by the output scale and printed with six decimals.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use glam::DVec3;
use grotto_config::OutputConfig;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::SceneError;
use crate::scene::CaveScene;
use crate::session::validate_output;

fn write_point<W: Write>(out: &mut W, tag: &str, p: DVec3, scale: f64) -> io::Result<()> {
    writeln!(
        out,
        "{tag} {:.6} {:.6} {:.6}",
        scale * p.x,
        scale * p.y,
        scale * p.z
    )
}

/// Stream `scene` to `out`.
pub fn write_scene<W: Write>(
    out: &mut W,
    scene: &CaveScene,
    material_library: &str,
    scale: f64,
) -> io::Result<()> {
    writeln!(out, "mtllib {material_library}\n")?;

    for &v in scene.buffers.vertices() {
        write_point(out, "v", v, scale)?;
    }
    writeln!(out)?;

    for &p in scene.buffers.helper_points() {
        write_point(out, "ng", p, scale)?;
    }
    writeln!(out)?;

    let camera = &scene.camera;
    writeln!(
        out,
        "camera {} {} {} {:.1}",
        camera.position, camera.look_target, camera.up, camera.fov_degrees
    )?;
    let light = &scene.light;
    writeln!(
        out,
        "ld {} {} {} {:.1}\n",
        light.direction, light.params[0], light.params[1], light.intensity
    )?;

    for group in scene.buffers.groups() {
        writeln!(out, "usemtl {}", group.material)?;
        for face in &group.faces {
            let [a, b, c] = face.0;
            writeln!(out, "f {a} {b} {c}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Render the whole scene into a string.
pub fn render_scene(scene: &CaveScene, material_library: &str, scale: f64) -> String {
    let mut bytes = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_scene(&mut bytes, scene, material_library, scale);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Permission bits of every written file on unix. Temp files start out
/// owner-only, so the mode is set explicitly before the rename.
#[cfg(unix)]
pub(crate) const OUTPUT_FILE_MODE: u32 = 0o644;

/// Write a file through a temporary sibling, renamed into place once complete.
///
/// A failure at any point leaves no file at `path`. On unix the finished file
/// has mode [`OUTPUT_FILE_MODE`].
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), SceneError>
where
    F: FnOnce(&mut BufWriter<&mut fs::File>) -> io::Result<()>,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| SceneError::io(parent, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(OUTPUT_FILE_MODE))
            .map_err(|e| SceneError::io(path, e))?;
    }

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer).map_err(|e| SceneError::io(path, e))?;
        writer.flush().map_err(|e| SceneError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| SceneError::io(path, e))?;
    tmp.persist(path).map_err(|e| SceneError::io(path, e.error))?;
    Ok(())
}

/// Save `scene` to the configured path. Returns the path written.
pub fn save_scene(scene: &CaveScene, output: &OutputConfig) -> Result<PathBuf, SceneError> {
    validate_output(output)?;

    write_atomically(&output.path, |w| {
        write_scene(w, scene, &output.material_library, output.scale)
    })?;

    let stats = scene.stats();
    info!(
        path = %output.path.display(),
        vertices = stats.vertices,
        faces = stats.faces,
        "scene written"
    );
    Ok(output.path.clone())
}
