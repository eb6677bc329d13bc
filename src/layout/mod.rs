use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::net::BipartiteGraph;
use crate::util::stable_pair;

mod quadtree;

use quadtree::QuadNode;

pub type Positions = HashMap<String, Vec2>;

pub const DEFAULT_ITERATIONS: usize = 300;

const BARNES_HUT_MIN_NODES: usize = 64;
const BARNES_HUT_THETA: f32 = 0.72;

pub fn force_layout(graph: &BipartiteGraph, iterations: usize) -> Positions {
    let n = graph.node_count();
    if n == 0 {
        return Positions::new();
    }

    let ids = graph.nodes().map(|(id, _)| id).collect::<Vec<_>>();
    let edges = graph
        .edges()
        .filter_map(|(from, to)| Some((graph.index_of(from)?, graph.index_of(to)?)))
        .collect::<Vec<_>>();

    let base_radius = (n as f32).sqrt() * 120.0;
    let mut positions = ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let angle = (index as f32 / n as f32) * TAU;
            let (jx, jy) = stable_pair(id);
            vec2(angle.cos(), angle.sin()) * base_radius + vec2(jx, jy) * 60.0
        })
        .collect::<Vec<_>>();

    if n > 1 {
        relax(&mut positions, &edges, base_radius, iterations);
    }

    ids.into_iter()
        .map(str::to_owned)
        .zip(positions)
        .collect()
}

fn relax(positions: &mut [Vec2], edges: &[(usize, usize)], base_radius: f32, iterations: usize) {
    let n = positions.len();
    let area = (base_radius * 2.0).powi(2);
    let k = (area / n as f32).sqrt().max(24.0);
    let min_distance = k * 0.35;
    let mut temperature = (k * 3.0).max(80.0);

    let pair_force = |delta: Vec2| {
        let distance = delta.length().max(0.5);
        let mut force = (k * k) / distance;
        if distance < min_distance {
            force += (min_distance - distance) * 2.0;
        }
        delta / distance * force
    };

    for _ in 0..iterations {
        let mut disp = vec![Vec2::ZERO; n];

        if n < BARNES_HUT_MIN_NODES {
            for i in 0..n {
                for j in (i + 1)..n {
                    let push = pair_force(positions[i] - positions[j]);
                    disp[i] += push;
                    disp[j] -= push;
                }
            }
        } else if let Some(tree) = QuadNode::build(positions) {
            for (i, d) in disp.iter_mut().enumerate() {
                *d += tree.repulsion_on(i, positions, BARNES_HUT_THETA, &pair_force);
            }
        }

        for &(from, to) in edges {
            if from >= n || to >= n || from == to {
                continue;
            }

            let delta = positions[from] - positions[to];
            let distance = delta.length().max(0.5);
            let pull = delta / distance * (distance * distance / k);
            disp[from] -= pull;
            disp[to] += pull;
        }

        for (position, d) in positions.iter_mut().zip(&disp) {
            let d = *d - *position * 0.001;
            let length = d.length();
            if length > 0.0 {
                *position += d / length * length.min(temperature);
            }
        }

        temperature *= 0.97;
        if temperature < 0.5 {
            break;
        }
    }
}

pub fn circular_layout(graph: &BipartiteGraph) -> Positions {
    let n = graph.node_count();
    let radius = (n as f32).sqrt() * 80.0;
    graph
        .nodes()
        .enumerate()
        .map(|(index, (id, _))| {
            let angle = (index as f32 / n.max(1) as f32) * TAU;
            (id.to_owned(), vec2(angle.cos(), angle.sin()) * radius)
        })
        .collect()
}
