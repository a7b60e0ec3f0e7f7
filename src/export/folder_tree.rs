use crate::export::models::FolderChoice;
use crate::lark::models::FolderMeta;
use crate::lark::DriveClient;
use crate::libs::constants::MY_SPACE_LABEL;

/// One folder in the destination picker. Children are fetched at most once
/// (`children == None` means "never fetched"); the expanded flag toggles
/// independently of data freshness.
#[derive(Debug, Clone)]
pub struct FolderNode {
    pub token: String,
    pub name: String,
    expanded: bool,
    children: Option<Vec<FolderNode>>,
}

impl FolderNode {
    fn new(token: String, name: String) -> Self {
        Self {
            token,
            name,
            expanded: false,
            children: None,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// `None` until the node has been toggled once.
    pub fn children(&self) -> Option<&[FolderNode]> {
        self.children.as_deref()
    }

    fn find_mut(&mut self, token: &str) -> Option<&mut FolderNode> {
        if self.token == token {
            return Some(self);
        }
        self.children
            .as_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(token))
    }
}

/// Selection model for the destination-folder dialog. At most one folder is
/// selected at a time; a pre-selection hint lets the host confirm the last
/// used destination without re-picking it.
#[derive(Debug)]
pub struct FolderTree {
    root: FolderNode,
    selected: Option<FolderChoice>,
}

impl FolderTree {
    pub fn new(root: FolderMeta, preselected: Option<FolderChoice>) -> Self {
        let name = root
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| MY_SPACE_LABEL.to_string());
        Self {
            root: FolderNode::new(root.token, name),
            selected: preselected,
        }
    }

    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    pub fn selection(&self) -> Option<&FolderChoice> {
        self.selected.as_ref()
    }

    /// Selecting a folder replaces any previous selection.
    pub fn select(&mut self, token: &str, name: &str) {
        self.selected = Some(FolderChoice {
            token: token.to_string(),
            name: name.to_string(),
        });
    }

    /// Expand or collapse a node, fetching its children on first expansion.
    /// Returns false when the token is not part of the tree yet.
    pub async fn toggle(&mut self, client: &dyn DriveClient, token: &str) -> bool {
        let Some(node) = self.root.find_mut(token) else {
            return false;
        };

        if node.children.is_none() {
            let children = client
                .list_child_folders(token)
                .await
                .into_iter()
                .map(|folder| {
                    FolderNode::new(folder.token, folder.name.unwrap_or_default())
                })
                .collect();
            node.children = Some(children);
        }

        node.expanded = !node.expanded;
        true
    }
}
