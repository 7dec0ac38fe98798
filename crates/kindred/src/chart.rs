use crate::render::{
    ChartLayout, DeterministicTextMeasurer, Fold, NoThumbnails, NodeId, Result,
    SvgRenderOptions, TextMeasurer, ThumbnailLoader, render_chart_svg,
};
use kindred_core::{ChartOptions, FamilyTree};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A descendants chart with its collapse state.
///
/// The hierarchy, layout and links are rebuilt from scratch on every draw; only the set of
/// collapsed node ids survives between draws.
#[derive(Clone)]
pub struct Chart {
    tree: FamilyTree,
    options: ChartOptions,
    collapsed: BTreeSet<NodeId>,
    svg_options: SvgRenderOptions,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    thumbnails: Arc<dyn ThumbnailLoader + Send + Sync>,
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("options", &self.options)
            .field("collapsed", &self.collapsed)
            .field("nodes", &self.tree.node_count())
            .finish_non_exhaustive()
    }
}

impl Chart {
    pub fn new(tree: FamilyTree, options: ChartOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            tree,
            options,
            collapsed: BTreeSet::new(),
            svg_options: SvgRenderOptions::default(),
            measurer: Arc::new(DeterministicTextMeasurer::default()),
            thumbnails: Arc::new(NoThumbnails),
        })
    }

    pub fn from_json(tree_json: &str, options: ChartOptions) -> Result<Self> {
        Self::new(FamilyTree::from_json(tree_json)?, options)
    }

    pub fn with_svg_options(mut self, svg_options: SvgRenderOptions) -> Self {
        self.svg_options = svg_options;
        self
    }

    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn with_thumbnail_loader(
        mut self,
        thumbnails: Arc<dyn ThumbnailLoader + Send + Sync>,
    ) -> Self {
        self.thumbnails = thumbnails;
        self
    }

    pub fn tree(&self) -> &FamilyTree {
        &self.tree
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn collapsed(&self) -> &BTreeSet<NodeId> {
        &self.collapsed
    }

    pub fn is_collapsed(&self, id: NodeId) -> bool {
        self.collapsed.contains(&id)
    }

    /// Flips the fold state of `id` and returns the new state.
    pub fn toggle(&mut self, id: NodeId) -> Fold {
        let fold = if self.collapsed.remove(&id) {
            Fold::Expanded
        } else {
            self.collapsed.insert(id);
            Fold::Collapsed
        };
        tracing::debug!(node = id, ?fold, "toggled chart node");
        fold
    }

    pub fn collapse(&mut self, id: NodeId) {
        self.collapsed.insert(id);
    }

    pub fn expand(&mut self, id: NodeId) {
        self.collapsed.remove(&id);
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    pub fn layout(&self) -> Result<ChartLayout> {
        Ok(kindred_render::layout_chart(
            &self.tree,
            &self.options,
            &self.collapsed,
        )?)
    }

    pub fn draw_svg(&self) -> Result<String> {
        let layout = self.layout()?;
        Ok(render_chart_svg(
            &layout,
            &self.options,
            &self.svg_options,
            self.measurer.as_ref(),
            self.thumbnails.as_ref(),
        ))
    }
}
