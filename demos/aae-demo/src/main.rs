//! aae-demo — smallest runnable example for the Accessibility Analysis Engine.
//!
//! Analyzes a synthetic six-node downtown footway network: a stairway
//! shortcut, a raised-kerb cul-de-sac, a gravel path to a hospital, and one
//! crowdsourced report. Prints the baseline accessibility scores and the
//! ranked list of access blockers, the way a host job would before caching
//! the result payload.

mod network;

use std::time::Instant;

use anyhow::Result;

use aae_core::{AggregatedReport, Anchor, BoundingBox, Confidence, EngineProfile, OverpassQueryVersion};
use aae_engine::{AnalysisEngine, AnalysisRequest};

fn main() -> Result<()> {
    let elements = network::build_elements();

    // One crowdsourced report flagging the gravel stretch to the hospital.
    let reports = vec![AggregatedReport {
        report_id: "rep-1001".to_string(),
        category: "Accessibility issue".to_string(),
        confidence: Confidence::Medium,
        reports_count: 4,
        renouncements: 1,
        effective_reports: 3,
        coordinates: Some([-88.0416, 30.6949]),
    }];

    let bbox = BoundingBox::new(-88.045, 30.692, -88.039, 30.698);
    let anchor = Anchor { point: Some([-88.0431, 30.6944]), poi_id: Some("plaza-anchor".to_string()) };

    let request = AnalysisRequest {
        bbox,
        elements: &elements,
        anchor,
        reports: &reports,
        overpass_query_version: OverpassQueryVersion("demo-v1".to_string()),
    };

    let engine = AnalysisEngine::new(EngineProfile::default());

    let t0 = Instant::now();
    let payload = engine.analyze(&request)?;
    let elapsed = t0.elapsed();

    println!("Analysis complete in {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    println!();
    println!("{}", payload.meta.calculation_method);
    println!();
    println!(
        "Baseline  NAS={:>6.1}  OAS={:>6.1}  GAI={:>6.1}",
        payload.meta.accessibility.nas, payload.meta.accessibility.oas, payload.meta.accessibility.gai
    );
    println!(
        "Counts    ways={} nodes={} pass={} limited={} blocked={} components={} pois(snapped/unsnapped)={}/{}",
        payload.meta.counts.pedestrian_ways,
        payload.meta.counts.graph_nodes,
        payload.meta.counts.pass_edges,
        payload.meta.counts.limited_edges,
        payload.meta.counts.blocked_edges,
        payload.meta.counts.components,
        payload.meta.counts.snapped_pois,
        payload.meta.counts.unsnapped_pois,
    );
    if !payload.meta.warnings.is_empty() {
        println!("Warnings:");
        for w in &payload.meta.warnings {
            println!("  - {w}");
        }
    }
    println!();

    println!("{:<8} {:<10} {:<18} {:<8} {:<10} {:<10}", "Rank", "Kind", "Way/OSM id", "Unlock m", "ΔGAI", "Score");
    println!("{}", "-".repeat(72));
    for (i, c) in payload.rankings.iter().enumerate() {
        println!(
            "{:<8} {:<10} {:<18} {:<8} {:<10.3} {:<10.3}",
            i + 1,
            c.blocker_kind.unwrap_or("report"),
            c.osm_id,
            c.unlock_m,
            c.delta_general_points,
            c.rank_score,
        );
    }

    if payload.rankings.is_empty() {
        println!("(no candidates)");
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&payload.meta)?);

    Ok(())
}
