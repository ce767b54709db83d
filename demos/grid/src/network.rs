//! Perturbed grid road network.

use pf_core::{GeoPoint, LinkId, NodeId, SampleRng};
use pf_network::{NetworkResult, RoadNetwork, RoadNetworkBuilder};

const BASE_LAT: f32 = 30.650;
const BASE_LON: f32 = -88.100;
/// Grid cell size in degrees (about 550 m).
const SPACING: f32 = 0.005;

/// `rows × cols` intersections with two-way streets between grid
/// neighbours.  Every node is displaced by up to `perturbation` cells.
///
/// Links are numbered from 1, node by node in row-major order, in the
/// order right, down, left, up.  Physical and virtual length are the
/// great-circle distance.
pub fn build_grid(rows: usize, cols: usize, perturbation: f32, rng: &mut SampleRng) -> NetworkResult<RoadNetwork> {
    let mut b = RoadNetworkBuilder::with_capacity(rows * cols, 4 * rows * cols);

    let mut nodes: Vec<NodeId> = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            let di: f32 = rng.gen_range(-perturbation..=perturbation);
            let dj: f32 = rng.gen_range(-perturbation..=perturbation);
            let pos = GeoPoint::new(BASE_LAT, BASE_LON).offset((i as f32 + di) * SPACING, (j as f32 + dj) * SPACING);
            nodes.push(b.add_node(pos));
        }
    }

    let at = |i: usize, j: usize| nodes[i * cols + j];
    let mut next = 1u32;
    for i in 0..rows {
        for j in 0..cols {
            let here = at(i, j);
            let mut neighbours = Vec::with_capacity(4);
            if j + 1 < cols {
                neighbours.push(at(i, j + 1));
            }
            if i + 1 < rows {
                neighbours.push(at(i + 1, j));
            }
            if j > 0 {
                neighbours.push(at(i, j - 1));
            }
            if i > 0 {
                neighbours.push(at(i - 1, j));
            }
            for there in neighbours {
                b.add_geodesic_link(LinkId(next), here, there)?;
                next += 1;
            }
        }
    }

    Ok(b.build())
}
