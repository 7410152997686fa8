//! Frame Solver Example - Portal Frame
//!
//! Run with `RUST_LOG=info cargo run --bin frame-example` to see solver logs.

use std::sync::Arc;

use anyhow::Context;
use frame_solver::prelude::*;
use nalgebra::{Point3, Vector3};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Frame Solver Example: Portal Frame ===\n");

    let steel = Arc::new(Material::s355());
    let column = Arc::new(Section::i_section("HEA200", Arc::clone(&steel), 190.0, 200.0, 6.5, 10.0));
    let beam = Arc::new(Section::i_section("IPE300", Arc::clone(&steel), 300.0, 150.0, 7.1, 10.7));

    // Portal frame in the XZ plane, Z up
    //
    //     N1 -------- N2
    //     |          |
    //     |          |
    //     N0        N3
    //   Fixed     Fixed
    //
    let height = 4.0;
    let span = 6.0;

    let elements = vec![
        Element::new(
            Line::from_coords([0.0, 0.0, 0.0], [0.0, 0.0, height]),
            "Col1",
            Arc::clone(&column),
            None,
        )?,
        Element::new(
            Line::from_coords([0.0, 0.0, height], [span, 0.0, height]),
            "Beam",
            Arc::clone(&beam),
            None,
        )?,
        Element::new(
            Line::from_coords([span, 0.0, height], [span, 0.0, 0.0]),
            "Col2",
            Arc::clone(&column),
            None,
        )?,
    ];

    let supports = vec![
        Support::new(Point3::new(0.0, 0.0, 0.0), "111111"),
        Support::new(Point3::new(span, 0.0, 0.0), "111111"),
    ];

    let left = Point3::new(0.0, 0.0, height);
    let right = Point3::new(span, 0.0, height);
    let loads: Vec<Load> = vec![
        // Case 1: gravity, 20 kN/m on the beam lumped to the knees
        PointLoad::force(left, Vector3::new(0.0, 0.0, -span * 20.0 / 2.0), 1).into(),
        PointLoad::force(right, Vector3::new(0.0, 0.0, -span * 20.0 / 2.0), 1).into(),
        // Case 2: wind at roof level
        PointLoad::force(left, Vector3::new(10.0, 0.0, 0.0), 2).into(),
    ];

    let model = Model::new(elements, supports, loads);
    for issue in model.issues() {
        println!("Warning: {}", issue);
    }

    println!("Running linear analysis...\n");
    let solved = model
        .analyze(&AnalysisOptions::default())
        .context("portal frame analysis failed")?;

    let knee = solved.find_node(&left).context("left knee is not a node")?;

    for &case in solved.load_cases().ids() {
        println!("=== Results for load case {} ===\n", case);

        println!("Node Displacements:");
        for node in &solved.nodes {
            let disp = solved.node_displacement(node.id, case)?;
            println!(
                "  N{}: DX={:.4}mm, DZ={:.4}mm, RY={:.6}rad",
                node.id,
                disp.dx * 1000.0,
                disp.dz * 1000.0,
                disp.ry
            );
        }

        let sway = solved.node_displacement(knee, case)?;
        println!("  Left knee sway: {:.4}mm", sway.dx * 1000.0);

        println!("\nSupport Reactions:");
        for i in 0..solved.supports.len() {
            let rxn = solved.support_reactions(i, case)?;
            println!(
                "  S{}: FX={:.2}kN, FZ={:.2}kN, MY={:.2}kN·m",
                i, rxn.fx, rxn.fz, rxn.my
            );
        }

        println!("\nElement Forces:");
        for (i, elem) in solved.elements.iter().enumerate() {
            let forces = solved.element_forces(i, case)?;
            println!(
                "  {}: N={:.2}kN, Mmax={:.2}kN·m",
                elem.tag,
                forces.start.n,
                forces.max_moment()
            );
        }

        let summary = solved.summary(case)?;
        println!("\nSummary:");
        println!("{}\n", serde_json::to_string_pretty(&summary)?);
    }

    // Eurocode 3 utilization with buckling lengths from the frame topology
    let mut design_model = model.clone();
    apply_buckling_lengths(&mut design_model);
    let design_solved = design_model.analyze(&AnalysisOptions::default())?;
    let utils = utilizations(&design_solved, &DesignOptions::default())?;
    println!("=== Utilization ===\n");
    for (elem, util) in design_solved.elements.iter().zip(&utils) {
        println!(
            "  {} ({}): Lcr={:.2}m, util={:.3}",
            elem.tag, elem.section.tag, elem.buckling_length, util
        );
    }

    // Size the columns from a small HEA catalog
    let catalog: Vec<Arc<Section>> = [
        ("HEA100", 96.0, 100.0, 5.0, 8.0),
        ("HEA120", 114.0, 120.0, 5.0, 8.0),
        ("HEA140", 133.0, 140.0, 5.5, 8.5),
        ("HEA160", 152.0, 160.0, 6.0, 9.0),
        ("HEA180", 171.0, 180.0, 6.0, 9.5),
        ("HEA200", 190.0, 200.0, 6.5, 10.0),
    ]
    .iter()
    .map(|&(tag, h, w, tw, tf)| Arc::new(Section::i_section(tag, Arc::clone(&steel), h, w, tw, tf)))
    .collect();

    let report = SectionOptimizer::new(catalog)
        .with_targets(["Col1", "Col2"])
        .optimize(&model)?;

    println!("\n=== Column Sizing ===\n");
    for (elem, util) in report.model.elements.iter().zip(&report.utilizations) {
        if let Some(util) = util {
            println!("  {}: {} (util={:.3})", elem.tag, elem.section.tag, util);
        }
    }
    println!(
        "  iterations={}, converged={}, weight={:.1}kg",
        report.iterations, report.converged, report.weight
    );

    println!("\n=== Analysis Complete ===");
    Ok(())
}
