// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy k-capacitated clustering of a small jittered grid.
//!
//! This example shows how to:
//! - configure `understory_kcap` through `KCapParams`,
//! - inspect the backing kd-tree and candidate heap before extraction,
//! - drain the clusters and report their radii.
//!
//! Run:
//! - `cargo run -p understory_demos --example cluster_grid`
//! - `RUST_LOG=understory_kcap=trace cargo run -p understory_demos --example cluster_grid`

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_kcap::{KCapError, KCapFL, KCapParams};
use understory_xkd::LabeledPoint;

const COLUMNS: u32 = 6;
const ROWS: u32 = 4;

fn main() -> Result<(), KCapError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 24 points on a 6x4 grid. Odd columns are nudged toward their left
    // neighbor so that pairs along x are tighter than pairs along y.
    let points: Vec<LabeledPoint<String>> = (0..ROWS)
        .flat_map(|row| (0..COLUMNS).map(move |col| (row, col)))
        .map(|(row, col)| {
            let nudge = if col % 2 == 1 { -4.0 } else { 0.0 };
            let x = 10.0 * f64::from(col) + 5.0 + nudge;
            let y = 10.0 * f64::from(row) + 5.0 + f64::from(col % 3) * 0.5;
            let label = format!("r{row}c{col}");
            LabeledPoint::new(label, x, y)
        })
        .collect();

    let params = KCapParams {
        capacity: 3,
        bucket_size: 4,
        bounds: Rect::new(0.0, 0.0, 60.0, 40.0),
    };
    let mut kcap = KCapFL::with_params(params)?;
    kcap.build(points)?;

    println!("kd-tree:");
    for line in kcap.list_kd_tree() {
        println!("  {line}");
    }
    println!("candidate heap holds {} lines", kcap.list_heap().len());

    for (i, cluster) in kcap.drain_clusters().enumerate() {
        let anchor = cluster[0].point;
        let radius = cluster
            .iter()
            .map(|p| anchor.distance(p.point))
            .fold(0.0_f64, f64::max);
        let labels: Vec<&str> = cluster.iter().map(|p| p.label.as_str()).collect();
        println!("cluster {i}: {labels:?} radius {radius:.2}");
    }
    Ok(())
}
