//! Per-iteration result files
//!
//! Obstacle snapshots are flat text, one obstacle per line with its channels
//! separated by spaces. Trajectories are JSON documents named after the
//! configured output path with the iteration index appended to the stem.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::{Obstacle, ResultError};
use crate::navigation::planner::Trajectory;

const DEFAULT_EXTENSION: &str = "json";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ResultError + '_ {
    move |source| ResultError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes obstacle snapshots and trajectories for each replanning cycle
#[derive(Debug, Clone)]
pub struct ResultWriter {
    directory: PathBuf,
    stem: String,
    extension: String,
}

impl ResultWriter {
    /// Derive file naming from the configured output path (e.g. `results/result.json`)
    pub fn new<P: AsRef<Path>>(output: P) -> Self {
        let output = output.as_ref();
        let directory = output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "result".to_string());
        let extension = output
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        ResultWriter {
            directory,
            stem,
            extension,
        }
    }

    /// `<dir>/<stem>_<iteration>.<ext>`
    pub fn trajectory_path(&self, iteration: usize) -> PathBuf {
        self.directory
            .join(format!("{}_{}.{}", self.stem, iteration, self.extension))
    }

    /// `<dir>/obstacles_<iteration>.txt`
    pub fn obstacle_path(&self, iteration: usize) -> PathBuf {
        self.directory.join(format!("obstacles_{}.txt", iteration))
    }

    fn ensure_directory(&self) -> Result<(), ResultError> {
        if self.directory.as_os_str().is_empty() || self.directory.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.directory).map_err(io_error(&self.directory))
    }

    /// Write an obstacle snapshot for one cycle
    pub fn write_obstacles(
        &self,
        iteration: usize,
        obstacles: &[Obstacle],
    ) -> Result<PathBuf, ResultError> {
        self.ensure_directory()?;
        let path = self.obstacle_path(iteration);
        write_obstacles(&path, obstacles)?;
        debug!("wrote {} obstacles to {}", obstacles.len(), path.display());
        Ok(path)
    }

    /// Write the trajectory computed in one cycle
    pub fn write_trajectory(
        &self,
        iteration: usize,
        trajectory: &Trajectory,
    ) -> Result<PathBuf, ResultError> {
        self.ensure_directory()?;
        let path = self.trajectory_path(iteration);
        write_trajectory(&path, trajectory)?;
        debug!("wrote trajectory with {} samples to {}", trajectory.len(), path.display());
        Ok(path)
    }
}

/// Write obstacles as space-separated channels, one obstacle per line
pub fn write_obstacles(path: &Path, obstacles: &[Obstacle]) -> Result<(), ResultError> {
    let file = fs::File::create(path).map_err(io_error(path))?;
    let mut out = BufWriter::new(file);
    for obstacle in obstacles {
        let [x, y, radius] = obstacle.channels();
        writeln!(out, "{} {} {}", x, y, radius).map_err(io_error(path))?;
    }
    out.flush().map_err(io_error(path))
}

/// Write a trajectory as a JSON document
pub fn write_trajectory(path: &Path, trajectory: &Trajectory) -> Result<(), ResultError> {
    let file = fs::File::create(path).map_err(io_error(path))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, trajectory)?;
    writeln!(out).map_err(io_error(path))?;
    out.flush().map_err(io_error(path))
}

/// Read an obstacle file written by [`write_obstacles`]. Blank lines are skipped.
pub fn read_obstacles(path: &Path) -> Result<Vec<Obstacle>, ResultError> {
    let file = fs::File::open(path).map_err(io_error(path))?;
    let mut obstacles = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_error(path))?;
        if line.trim().is_empty() {
            continue;
        }
        let channels: Vec<f64> = line
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| ResultError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
            })?;
        match channels.as_slice() {
            &[x, y, radius] => obstacles.push(Obstacle::new(x, y, radius)),
            _ => {
                return Err(ResultError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                })
            }
        }
    }

    Ok(obstacles)
}
