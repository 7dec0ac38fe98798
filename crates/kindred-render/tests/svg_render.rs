use kindred_core::{ChartOptions, FamilyTree, LayoutDirection};
use kindred_render::layout_chart;
use kindred_render::svg::{SvgRenderOptions, render_chart_svg};
use kindred_render::text::DeterministicTextMeasurer;
use kindred_render::thumbnail::{FileThumbnailLoader, NoThumbnails, ThumbnailLoader};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn load_fixture(name: &str) -> FamilyTree {
    let path = workspace_root().join("fixtures").join("family").join(name);
    FamilyTree::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap()
}

fn render(tree: &FamilyTree, chart: &ChartOptions, loader: &dyn ThumbnailLoader) -> String {
    let layout = layout_chart(tree, chart, &BTreeSet::new()).unwrap();
    render_chart_svg(
        &layout,
        chart,
        &SvgRenderOptions::default(),
        &DeterministicTextMeasurer::default(),
        loader,
    )
}

#[test]
fn draws_every_real_person_and_visible_link() {
    let tree = load_fixture("two_families.json");
    let svg = render(&tree, &ChartOptions::default(), &NoThumbnails);
    assert!(svg.starts_with("<svg "));
    assert!(svg.trim_end().ends_with("</svg>"));
    // four real people, the placeholder slot is not drawn
    assert_eq!(svg.matches(r#"<g class="person "#).count(), 4);
    assert_eq!(svg.matches("link-child").count(), 2);
    // the only spouse connector is the first spouse's, which has no path
    assert_eq!(svg.matches("link-spouse").count(), 0);
    assert!(svg.contains("layout-left-right"));
}

#[test]
fn boxes_link_to_individual_pages() {
    let tree = load_fixture("couple_two_children.json");
    let chart = ChartOptions {
        individual_url: Some("/tree/demo/individual/{xref}".to_string()),
        open_new_tab_on_click: true,
        ..Default::default()
    };
    let svg = render(&tree, &chart, &NoThumbnails);
    assert!(svg.contains(r#"<a href="/tree/demo/individual/I3" target="_blank" rel="noopener">"#));
}

#[test]
fn vertical_boxes_show_alternative_names() {
    let tree = load_fixture("three_spouses.json");
    let chart = ChartOptions {
        layout: LayoutDirection::TopBottom,
        show_alternative_name: true,
        ..Default::default()
    };
    let svg = render(&tree, &chart, &NoThumbnails);
    assert!(svg.contains("Отто Брандт"));
    assert!(svg.contains(r#"height="205""#));
    // third spouse connector is drawn
    assert_eq!(svg.matches("link-spouse").count(), 2);
}

#[test]
fn thumbnails_are_embedded_or_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("adam.png"), b"\x89PNG").unwrap();
    let json = std::fs::read_to_string(
        workspace_root().join("fixtures/family/couple_two_children.json"),
    )
    .unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["children"][0]["data"]["thumbnail"] = "adam.png".into();
    value["children"][1]["data"]["thumbnail"] = "missing.png".into();
    let tree = FamilyTree::from_value(value).unwrap();

    let loader = FileThumbnailLoader::new(dir.path());
    let svg = render(&tree, &ChartOptions::default(), &loader);
    assert_eq!(svg.matches("<image ").count(), 1);
    assert!(svg.contains(r#"href="data:image/png;base64,"#));
    assert_eq!(svg.matches(r#"class="image-empty""#).count(), 3);
}

#[test]
fn collapsed_nodes_show_an_expand_toggle() {
    let tree = load_fixture("couple_two_children.json");
    let chart = ChartOptions::default();
    let layout = layout_chart(&tree, &chart, &BTreeSet::from([2])).unwrap();
    let svg = render_chart_svg(
        &layout,
        &chart,
        &SvgRenderOptions::default(),
        &DeterministicTextMeasurer::default(),
        &NoThumbnails,
    );
    assert!(svg.contains(r#"<g class="toggle" data-node="2""#));
    assert!(svg.contains("<text>+</text>"));
    assert_eq!(svg.matches(r#"<g class="person "#).count(), 2);
}
