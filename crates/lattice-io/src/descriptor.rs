// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Snapshot Descriptors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! XDMF-family XML descriptors for the snapshot containers.
//!
//! Each snapshot gets a `Uniform` grid over a `3DCoRectMesh` topology of
//! `(Nz+1, Ny+1, Nx+1)` vertices carrying cell-centered attributes; the
//! collection descriptor concatenates every recorded snapshot into a
//! temporal series for playback.

use std::fmt::Write;

use crate::snapshot::FIELD_NAMES;

/// One `<Grid>` element for a single snapshot. `global` is `[Nx, Ny, Nz]`,
/// `spacing` is `[dx, dy, dz]`; both are emitted in `(z, y, x)` order as
/// XDMF expects.
fn grid_element(container: &str, step: usize, global: [usize; 3], spacing: [f64; 3]) -> String {
    let [nx, ny, nz] = global;
    let [dx, dy, dz] = spacing;
    let mut xml = String::new();
    let _ = write!(
        xml,
        r#"    <Grid Name="step_{step:06}" GridType="Uniform">
      <Time Value="{step}"/>
      <Topology TopologyType="3DCoRectMesh" Dimensions="{tz} {ty} {tx}"/>
      <Geometry GeometryType="ORIGIN_DXDYDZ">
        <DataItem Name="Origin" Dimensions="3" NumberType="Float" Precision="8" Format="XML">0 0 0</DataItem>
        <DataItem Name="Spacing" Dimensions="3" NumberType="Float" Precision="8" Format="XML">{dz} {dy} {dx}</DataItem>
      </Geometry>
"#,
        tz = nz + 1,
        ty = ny + 1,
        tx = nx + 1,
    );
    for name in FIELD_NAMES {
        let _ = write!(
            xml,
            r#"      <Attribute Name="{name}" AttributeType="Scalar" Center="Cell">
        <DataItem Dimensions="{nz} {ny} {nx}" NumberType="Float" Precision="8" Format="Binary">{container}:/{name}</DataItem>
      </Attribute>
"#,
        );
    }
    xml.push_str("    </Grid>\n");
    xml
}

fn document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" ?>
<!DOCTYPE Xdmf SYSTEM "Xdmf.dtd" []>
<Xdmf Version="3.0">
  <Domain>
{body}  </Domain>
</Xdmf>
"#
    )
}

/// Descriptor for one snapshot.
pub fn snapshot_descriptor(
    container: &str,
    step: usize,
    global: [usize; 3],
    spacing: [f64; 3],
) -> String {
    document(&grid_element(container, step, global, spacing))
}

/// Temporal collection over every recorded snapshot of a case.
pub fn collection_descriptor(
    case_name: &str,
    steps: &[usize],
    global: [usize; 3],
    spacing: [f64; 3],
) -> String {
    let mut body = String::from(
        "    <Grid Name=\"series\" GridType=\"Collection\" CollectionType=\"Temporal\">\n",
    );
    for &step in steps {
        let container = format!("{case_name}_{step:06}.npz");
        for line in grid_element(&container, step, global, spacing).lines() {
            body.push_str("  ");
            body.push_str(line);
            body.push('\n');
        }
    }
    body.push_str("    </Grid>\n");
    document(&body)
}
