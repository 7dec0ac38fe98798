#![cfg(feature = "render")]

use kindred::render::{Fold, HeadlessError, LinkKind};
use kindred::{Chart, ChartOptions, LayoutDirection};
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn fixture_text(name: &str) -> String {
    let path = workspace_root().join("fixtures").join("family").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

#[test]
fn toggle_round_trips_the_fold_state() {
    let mut chart = Chart::from_json(
        &fixture_text("three_spouses.json"),
        ChartOptions {
            layout: LayoutDirection::TopBottom,
            ..Default::default()
        },
    )
    .unwrap();
    let full = chart.layout().unwrap();

    assert_eq!(chart.toggle(2), Fold::Collapsed);
    assert!(chart.is_collapsed(2));
    let folded = chart.layout().unwrap();
    assert!(folded.nodes.len() < full.nodes.len());
    assert_eq!(folded.node(2).unwrap().fold, Fold::Collapsed);

    assert_eq!(chart.toggle(2), Fold::Expanded);
    let again = chart.layout().unwrap();
    assert_eq!(again.nodes.len(), full.nodes.len());
    for (a, b) in again.nodes.iter().zip(&full.nodes) {
        assert_eq!((a.id, a.x, a.y), (b.id, b.x, b.y));
    }
}

#[test]
fn expand_all_clears_every_collapsed_node() {
    let mut chart =
        Chart::from_json(&fixture_text("three_spouses.json"), ChartOptions::default()).unwrap();
    chart.collapse(2);
    chart.collapse(7);
    assert_eq!(chart.collapsed().len(), 2);
    chart.expand(7);
    assert_eq!(chart.collapsed().len(), 1);
    chart.expand_all();
    assert!(chart.collapsed().is_empty());
}

#[test]
fn draw_svg_includes_links_and_people() {
    let chart = Chart::from_json(
        &fixture_text("couple_two_children.json"),
        ChartOptions::default(),
    )
    .unwrap();
    let layout = chart.layout().unwrap();
    assert_eq!(layout.links.iter().filter(|l| l.kind == LinkKind::Child).count(), 2);
    let svg = chart.draw_svg().unwrap();
    assert!(svg.contains("Beatrix"));
    assert_eq!(svg.matches("link-child").count(), 2);
}

#[test]
fn bad_input_is_reported() {
    let err = Chart::from_json("{", ChartOptions::default()).unwrap_err();
    assert!(matches!(err, HeadlessError::Input(_)));

    let err = Chart::from_json(
        r#"{"children": []}"#,
        ChartOptions {
            generations: 1,
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        HeadlessError::Input(kindred::Error::GenerationsOutOfRange { .. })
    ));
}

#[cfg(feature = "raster")]
#[test]
fn chart_rasterizes_to_png() {
    use kindred::render::raster::RasterOptions;
    let chart = Chart::from_json(
        &fixture_text("couple_two_children.json"),
        ChartOptions::default(),
    )
    .unwrap();
    let png = chart.draw_png(&RasterOptions::default()).unwrap();
    assert!(png.starts_with(b"\x89PNG"));
}
