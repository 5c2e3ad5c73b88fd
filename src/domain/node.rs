//! Turns a single flat record into a childless menu node.

use tracing::trace;

use crate::domain::collaborators::{AccessCheck, Translate};
use crate::domain::entities::{FlatRecord, MenuMode, TreeNode};
use crate::domain::link::LinkResolver;

/// Shared by the forward scan and the indexed builder, so both strategies
/// produce identical nodes and call the collaborators in the same way.
pub struct NodeFactory<'c, E> {
    mode: MenuMode,
    links: LinkResolver,
    access: &'c dyn AccessCheck<E>,
    translator: &'c dyn Translate<E>,
}

impl<'c, E> NodeFactory<'c, E> {
    pub fn new(
        mode: MenuMode,
        access: &'c dyn AccessCheck<E>,
        translator: &'c dyn Translate<E>,
    ) -> Self {
        Self {
            mode,
            links: LinkResolver::new(),
            access,
            translator,
        }
    }

    pub fn mode(&self) -> MenuMode {
        self.mode
    }

    /// Build the node for `record`; `children` is left empty.
    pub fn build<I>(&self, record: &FlatRecord<I>) -> Result<TreeNode, E> {
        let mut node = TreeNode::new(record.name.clone());
        node.link = self.links.resolve(record.raw_link());

        if let Some(key) = &record.rbac_check {
            node.visible = Some(self.access.can(key)?);
        }

        if self.mode.is_extended() {
            node.icon = record.icon.clone();
            node.class = record.css_class.clone().or_else(|| record.class.clone());
            if let Some(category) = &record.translation_category {
                node.label = self.translator.translate(category, &record.name)?;
            }
        }

        trace!(label = %node.label, link = ?node.link, "built node");
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::domain::collaborators::{Catalog, RoleSet};
    use crate::domain::entities::Link;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.insert("app", "Home", "Startseite");
        catalog
    }

    #[test]
    fn given_extended_mode_when_building_then_css_class_overrides_class() {
        let roles = RoleSet::default();
        let catalog = catalog();
        let factory: NodeFactory<Infallible> =
            NodeFactory::new(MenuMode::Extended, &roles, &catalog);
        let record = FlatRecord::new(1, 0, "Home")
            .with_class("plain")
            .with_css_class("fancy")
            .with_icon("home")
            .with_translation_category("app");

        let node = factory.build(&record).unwrap();

        assert_eq!(node.label, "Startseite");
        assert_eq!(node.class.as_deref(), Some("fancy"));
        assert_eq!(node.icon.as_deref(), Some("home"));
    }

    #[test]
    fn given_native_mode_when_building_then_styling_and_translation_skipped() {
        let roles = RoleSet::default();
        let catalog = catalog();
        let factory: NodeFactory<Infallible> = NodeFactory::new(MenuMode::Native, &roles, &catalog);
        let record = FlatRecord::new(1, 0, "Home")
            .with_route("home")
            .with_class("plain")
            .with_icon("home")
            .with_translation_category("app");

        let node = factory.build(&record).unwrap();

        assert_eq!(node.label, "Home");
        assert_eq!(node.link, Some(Link::Route("/home".into())));
        assert_eq!(node.icon, None);
        assert_eq!(node.class, None);
    }

    #[test]
    fn given_rbac_key_when_building_then_visible_reflects_check() {
        let roles = RoleSet::new(["admin.access"]);
        let catalog = Catalog::default();
        let factory: NodeFactory<Infallible> = NodeFactory::new(MenuMode::Native, &roles, &catalog);

        let allowed = factory
            .build(&FlatRecord::new(1, 0, "Admin").with_rbac_check("admin.access"))
            .unwrap();
        let denied = factory
            .build(&FlatRecord::new(2, 0, "Billing").with_rbac_check("billing.view"))
            .unwrap();
        let open = factory.build(&FlatRecord::new(3, 0, "Public")).unwrap();

        assert_eq!(allowed.visible, Some(true));
        assert_eq!(denied.visible, Some(false));
        assert_eq!(open.visible, None);
    }
}
