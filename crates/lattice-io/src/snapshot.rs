// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Snapshot Writer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Global field snapshots.
//!
//! Every rank contributes its interior hyperslab through the collective
//! gather; the root reassembles the logically global `(Nz, Ny, Nx)`
//! arrays and writes one NPZ container per snapshot (datasets `rho`,
//! `u`, `v`, `w`, C-order f64) plus the XDMF-family descriptors.

use std::fs::File;
use std::path::{Path, PathBuf};

use lattice_core::grid::Grid3D;
use lattice_core::topology::Topology;
use lattice_core::transport::Transport;
use lattice_types::config::SimulationConfig;
use lattice_types::error::{LatticeError, LatticeResult};
use lattice_types::state::MacroFields;
use ndarray::{s, Array3};
use ndarray_npy::{NpzReader, NpzWriter};

use crate::descriptor;

pub const FIELD_NAMES: [&str; 4] = ["rho", "u", "v", "w"];

/// The four macroscopic fields assembled on the global lattice, shape
/// `[Nz, Ny, Nx]`.
#[derive(Debug, Clone)]
pub struct GlobalSnapshot {
    pub rho: Array3<f64>,
    pub u: Array3<f64>,
    pub v: Array3<f64>,
    pub w: Array3<f64>,
}

impl GlobalSnapshot {
    pub fn field(&self, name: &str) -> Option<&Array3<f64>> {
        match name {
            "rho" => Some(&self.rho),
            "u" => Some(&self.u),
            "v" => Some(&self.v),
            "w" => Some(&self.w),
            _ => None,
        }
    }
}

/// Gather the interior hyperslabs of all ranks and assemble them on the
/// root. Every rank participates; only the root receives `Some`.
pub fn gather_global<T: Transport>(
    macros: &MacroFields,
    grid: &Grid3D,
    topology: &Topology,
    transport: &T,
) -> LatticeResult<Option<GlobalSnapshot>> {
    let mut assembled = Vec::with_capacity(4);
    for field in [&macros.rho, &macros.u, &macros.v, &macros.w] {
        let block: Vec<f64> = grid.interior_view(field).iter().copied().collect();
        match transport.gather_blocks(&block)? {
            Some(blocks) => assembled.push(assemble(blocks, grid, topology)?),
            None => return Ok(None),
        }
    }
    let mut fields = assembled.into_iter();
    // Four pushes above; the iterator cannot run dry.
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(rho), Some(u), Some(v), Some(w)) => Ok(Some(GlobalSnapshot { rho, u, v, w })),
        _ => Err(LatticeError::Container(
            "global assembly produced fewer than four fields".to_string(),
        )),
    }
}

/// Place each rank's `(MZ, MY, MX)` block at its global offset
/// `(pz*MZ, py*MY, px*MX)`.
fn assemble(
    blocks: Vec<Vec<f64>>,
    grid: &Grid3D,
    topology: &Topology,
) -> LatticeResult<Array3<f64>> {
    let [mx, my, mz] = grid.interior();
    let dims = topology.dims();
    let (nx, ny, nz) = (dims[0] * mx, dims[1] * my, dims[2] * mz);
    let mut global = Array3::zeros([nz, ny, nx]);
    for (rank, block) in blocks.into_iter().enumerate() {
        let local = Array3::from_shape_vec([mz, my, mx], block).map_err(|e| {
            LatticeError::Container(format!("rank {rank} hyperslab has wrong shape: {e}"))
        })?;
        let [px, py, pz] = topology.coords_of_rank(rank);
        global
            .slice_mut(s![
                pz * mz..(pz + 1) * mz,
                py * my..(py + 1) * my,
                px * mx..(px + 1) * mx
            ])
            .assign(&local);
    }
    Ok(global)
}

/// Writes one container plus descriptor per snapshot and maintains the
/// temporal collection descriptor.
pub struct SnapshotWriter {
    directory: PathBuf,
    case_name: String,
    spacing: [f64; 3],
    global: [usize; 3],
    recorded: Vec<usize>,
}

impl SnapshotWriter {
    pub fn new(config: &SimulationConfig) -> Self {
        SnapshotWriter {
            directory: PathBuf::from(&config.output.directory),
            case_name: config.case_name.clone(),
            spacing: config.output.spacing,
            global: config.domain.global,
            recorded: Vec::new(),
        }
    }

    pub fn container_path(&self, step: usize) -> PathBuf {
        self.directory
            .join(format!("{}_{:06}.npz", self.case_name, step))
    }

    pub fn descriptor_path(&self, step: usize) -> PathBuf {
        self.directory
            .join(format!("{}_{:06}.xmf", self.case_name, step))
    }

    pub fn collection_path(&self) -> PathBuf {
        self.directory.join(format!("{}.xmf", self.case_name))
    }

    /// Collective snapshot write. Non-root ranks only feed the gather.
    pub fn write<T: Transport>(
        &mut self,
        step: usize,
        macros: &MacroFields,
        grid: &Grid3D,
        topology: &Topology,
        transport: &T,
    ) -> LatticeResult<()> {
        let Some(snapshot) = gather_global(macros, grid, topology, transport)? else {
            return Ok(());
        };
        std::fs::create_dir_all(&self.directory)?;
        write_container(&self.container_path(step), &snapshot)?;

        let container_name = format!("{}_{:06}.npz", self.case_name, step);
        let descriptor =
            descriptor::snapshot_descriptor(&container_name, step, self.global, self.spacing);
        std::fs::write(self.descriptor_path(step), descriptor)?;

        self.recorded.push(step);
        let collection = descriptor::collection_descriptor(
            &self.case_name,
            &self.recorded,
            self.global,
            self.spacing,
        );
        std::fs::write(self.collection_path(), collection)?;
        Ok(())
    }

    pub fn recorded_steps(&self) -> &[usize] {
        &self.recorded
    }
}

fn write_container(path: &Path, snapshot: &GlobalSnapshot) -> LatticeResult<()> {
    let mut npz = NpzWriter::new(File::create(path)?);
    for name in FIELD_NAMES {
        let field = snapshot.field(name).ok_or_else(|| {
            LatticeError::Container(format!("unknown snapshot field '{name}'"))
        })?;
        npz.add_array(name, field)
            .map_err(|e| LatticeError::Container(format!("failed to write '{name}': {e}")))?;
    }
    npz.finish()
        .map_err(|e| LatticeError::Container(format!("failed to finish container: {e}")))?;
    Ok(())
}

/// Read a snapshot container back into the four global arrays.
pub fn read_snapshot(path: &Path) -> LatticeResult<GlobalSnapshot> {
    let file = File::open(path)?;
    let mut npz = NpzReader::new(file).map_err(|e| {
        LatticeError::Container(format!("failed to open '{}': {e}", path.display()))
    })?;
    let mut read = |name: &str| -> LatticeResult<Array3<f64>> {
        npz.by_name(name).map_err(|e| {
            LatticeError::Container(format!("failed to read dataset '{name}': {e}"))
        })
    };
    let rho = read("rho")?;
    let u = read("u")?;
    let v = read("v")?;
    let w = read("w")?;
    Ok(GlobalSnapshot { rho, u, v, w })
}
