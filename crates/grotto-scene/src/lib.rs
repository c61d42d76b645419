//! Crystal cave scene assembly.
//!
//! [`CaveGenerator`] validates parameters and runs one seeded generation:
//! camera and light first, then the cave shell, then crystals and pillars.
//! The result is a [`CaveScene`] that [`save_scene`] writes as text.
//!
//! ```no_run
//! use grotto_config::Config;
//! use grotto_scene::{CaveGenerator, save_scene};
//!
//! let config = Config::default();
//! let scene = CaveGenerator::for_config(&config)?.generate();
//! save_scene(&scene, &config.output)?;
//! # Ok::<(), grotto_scene::SceneError>(())
//! ```

pub mod director;
pub mod error;
pub mod scene;
pub mod session;
pub mod tools;
pub mod writer;

pub use director::{PlacementCounts, place_camera_and_light, place_crystals_and_pillars};
pub use error::SceneError;
pub use scene::{CameraRecord, CaveScene, LightRecord, SceneStats};
pub use session::{CaveGenerator, GenerationSession, validate, validate_output};
pub use tools::{
    LineCounts, clean_file, clean_records, count_file, count_records, faces_to_spheres,
    spheres_file,
};
pub use writer::{render_scene, save_scene, write_scene};
