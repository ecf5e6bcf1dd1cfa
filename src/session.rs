use crate::highlight::Highlight;
use crate::loader::{LoadError, Loader, TopologySource};
use crate::model::{CellId, LinkId, Topology, TreeId};
use crate::render::{self, Layout, PageOptions, Scene};
use crate::view::{ViewError, ViewState};

/// One `visualize()` worth of state: the parsed topology, what to draw, and
/// how it currently looks. Built fresh on every load and never patched in place.
#[derive(Debug, Clone)]
pub struct Session {
    topology: Topology,
    scene: Scene,
    view: ViewState,
}

impl Session {
    pub fn new(topology: Topology, layout: &Layout) -> Self {
        let scene = Scene::build(&topology, layout);
        let view = ViewState::new(&topology);
        Self {
            topology,
            scene,
            view,
        }
    }

    /// Run the loader and start a session on its result.
    pub async fn visualize<S: TopologySource>(
        loader: &Loader<S>,
        layout: &Layout,
    ) -> Result<Self, LoadError> {
        let topology = loader.load().await?;
        Ok(Self::new(topology, layout))
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn click_node(&mut self, id: &CellId) -> Result<&Highlight, ViewError> {
        self.view.click_node(&self.topology, id)
    }

    pub fn double_click_node(&mut self, id: &CellId) -> Result<(), ViewError> {
        self.view.double_click_node(id)
    }

    pub fn click_link(&mut self, id: &LinkId) -> Result<(), ViewError> {
        self.view.click_link(id).map(|_| ())
    }

    pub fn double_click_link(&mut self, id: &LinkId) -> Result<(), ViewError> {
        self.view.double_click_link(id)
    }

    pub fn show_stacked_tree(&mut self, tree: &TreeId) -> Result<&Highlight, ViewError> {
        self.view.show_stacked_tree(&self.topology, tree)
    }

    pub fn reset(&mut self) {
        self.view.reset();
    }

    /// Mark an element broken by id, whether it names a link or a cell.
    pub fn mark_broken(&mut self, id: &str) -> Result<(), ViewError> {
        if let Some(link) = LinkId::parse(id) {
            if self.view.link_state(&link).is_some() {
                return self.view.double_click_link(&link);
            }
        }
        self.view.double_click_node(&CellId::new(id))
    }

    pub fn svg(&self) -> String {
        render::render_svg(&self.scene, &self.view)
    }

    pub fn page(&self, title: &str, interactive: bool) -> String {
        let options = PageOptions {
            title,
            interactive,
            notice: None,
        };
        render::render_page(&self.scene, &self.view, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadOptions;
    use crate::loader::memory::full;
    use crate::view::{LinkState, NodeState};

    #[tokio::test]
    async fn test_visualize_builds_fresh_session() {
        let loader = Loader::new(full(), LoadOptions::default());
        let mut first = Session::visualize(&loader, &Layout::default()).await.unwrap();
        first.click_node(&CellId::from("C:0")).unwrap();

        let second = Session::visualize(&loader, &Layout::default()).await.unwrap();
        assert_eq!(second.scene().nodes.len(), 3);
        assert_eq!(second.scene().lines.len(), 2);
        assert!(second.view().active().is_none());
        assert!(first.view().active().is_some());
    }

    #[tokio::test]
    async fn test_click_and_stacked_tree() {
        let loader = Loader::new(full(), LoadOptions::default());
        let mut session = Session::visualize(&loader, &Layout::default()).await.unwrap();

        let hl = session.click_node(&CellId::from("C:0")).unwrap();
        assert_eq!(hl.links.len(), 2);

        let hl = session.show_stacked_tree(&TreeId::from("Base")).unwrap();
        assert_eq!(hl.root, Some(CellId::from("C:1")));
        assert_eq!(
            session.view().node_state(&CellId::from("C:2")),
            Some(NodeState::Stacked)
        );
    }

    #[tokio::test]
    async fn test_mark_broken_accepts_cells_and_links() {
        let loader = Loader::new(full(), LoadOptions::default());
        let mut session = Session::visualize(&loader, &Layout::default()).await.unwrap();

        session.mark_broken("C:0:P1-C:1:P1").unwrap();
        session.mark_broken("C:2").unwrap();
        assert!(session.mark_broken("C:9").is_err());

        let link = LinkId::parse("C:0:P1-C:1:P1").unwrap();
        assert_eq!(session.view().link_state(&link), Some(LinkState::Broken));
        assert!(session.svg().contains(r#"id="C:2" class="nodebroken""#));
    }
}
