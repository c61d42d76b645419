//! Line-oriented utilities over scene files: record counts, reduction to
//! plain geometry, and face-to-sphere conversion.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::error::SceneError;
use crate::writer::write_atomically;

const SPHERE_RADIUS_MIN: f64 = 0.05;
const SPHERE_RADIUS_MAX: f64 = 0.2;

/// Record counts of a scene file, keyed by each line's first token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub vertices: usize,
    pub faces: usize,
    pub cameras: usize,
    pub lights: usize,
    pub spheres: usize,
    pub helper_points: usize,
}

impl fmt::Display for LineCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vertices: {}", self.vertices)?;
        writeln!(f, "Faces: {}", self.faces)?;
        writeln!(f, "Cameras: {}", self.cameras)?;
        writeln!(f, "Lights: {}", self.lights)?;
        writeln!(f, "Spheres: {}", self.spheres)?;
        write!(f, "Non-geometric values: {}", self.helper_points)
    }
}

fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Count `v`, `f`, `camera`, `ld`, `sphere` and `ng` records.
pub fn count_records<R: BufRead>(input: R) -> io::Result<LineCounts> {
    let mut counts = LineCounts::default();
    for line in input.lines() {
        let line = line?;
        match first_token(&line) {
            Some("v") => counts.vertices += 1,
            Some("f") => counts.faces += 1,
            Some("camera") => counts.cameras += 1,
            Some("ld") => counts.lights += 1,
            Some("sphere") => counts.spheres += 1,
            Some("ng") => counts.helper_points += 1,
            _ => {}
        }
    }
    Ok(counts)
}

/// Keep only `v` and `f` records, dropping `/texture/normal` suffixes from face indices.
pub fn clean_records<R: BufRead, W: Write>(input: R, out: &mut W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim_start();
        match first_token(trimmed) {
            Some("v") => writeln!(out, "{trimmed}")?,
            Some("f") => {
                write!(out, "f")?;
                for token in trimmed.split_whitespace().skip(1) {
                    let index = token.split('/').next().unwrap_or(token);
                    write!(out, " {index}")?;
                }
                writeln!(out)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Replace each face by a sphere centered on its first vertex.
///
/// Radii are drawn from a generator seeded with `seed`, one per face in file
/// order. Every other line is copied with leading whitespace removed.
pub fn faces_to_spheres<R: BufRead, W: Write>(input: R, out: &mut W, seed: u64) -> io::Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim_start();
        let mut tokens = trimmed.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some("f"), Some(center)) => {
                let radius = rng.random_range(SPHERE_RADIUS_MIN..=SPHERE_RADIUS_MAX);
                writeln!(out, "sphere {center} {radius}")?;
            }
            _ => writeln!(out, "{trimmed}")?,
        }
    }
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>, SceneError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| SceneError::io(path, e))
}

/// [`count_records`] over a file.
pub fn count_file(path: &Path) -> Result<LineCounts, SceneError> {
    let counts = count_records(open(path)?).map_err(|e| SceneError::io(path, e))?;
    info!(path = %path.display(), ?counts, "counted records");
    Ok(counts)
}

/// [`clean_records`] from one file into another.
pub fn clean_file(input: &Path, output: &Path) -> Result<(), SceneError> {
    let reader = open(input)?;
    write_atomically(output, |w| clean_records(reader, w))?;
    info!(input = %input.display(), output = %output.display(), "cleaned scene file");
    Ok(())
}

/// [`faces_to_spheres`] from one file into another.
pub fn spheres_file(input: &Path, output: &Path, seed: u64) -> Result<(), SceneError> {
    let reader = open(input)?;
    write_atomically(output, |w| faces_to_spheres(reader, w, seed))?;
    info!(input = %input.display(), output = %output.display(), seed, "converted faces to spheres");
    Ok(())
}
