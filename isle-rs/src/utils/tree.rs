//! Tree structure rendering for world databases and animation clips

use console::Style;

use super::format_bytes;

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub size: Option<u64>,
    pub children: Vec<TreeNode>,
    /// Kept in insertion order
    pub metadata: Vec<(String, String)>,
    pub external_refs: Vec<ExternalRef>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    World,
    Model,
    Part,
    Roi,
    Lod,
    Texture,
    Animation,
}

/// A name resolved against another table of the file
#[derive(Debug, Clone)]
pub struct ExternalRef {
    pub name: String,
    pub ref_type: RefType,
    pub exists: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefType {
    Texture,
    SharedLods,
    Actor,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            no_color: false,
            show_metadata: true,
        }
    }
}

impl TreeNode {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            size: None,
            children: Vec::new(),
            metadata: Vec::new(),
            external_refs: Vec::new(),
        }
    }

    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_external_ref(mut self, name: &str, ref_type: RefType, exists: Option<bool>) -> Self {
        self.external_refs.push(ExternalRef {
            name: name.to_string(),
            ref_type,
            exists,
        });
        self
    }
}

impl ExternalRef {
    pub fn icon(&self) -> &'static str {
        match self.ref_type {
            RefType::Texture => "🖼️",
            RefType::SharedLods => "🔗",
            RefType::Actor => "🎭",
        }
    }

    /// Green when resolved, red when missing, yellow when not checked
    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self.exists {
                Some(true) => Style::new().green(),
                Some(false) => Style::new().red(),
                None => Style::new().yellow(),
            }
        }
    }
}

impl NodeType {
    pub fn icon(&self) -> &'static str {
        match self {
            NodeType::Root => "📁",
            NodeType::World => "🗺️",
            NodeType::Model => "🏗️",
            NodeType::Part => "🧩",
            NodeType::Roi => "📦",
            NodeType::Lod => "🔺",
            NodeType::Texture => "🖼️",
            NodeType::Animation => "📽️",
        }
    }

    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::World => Style::new().bold().yellow(),
                NodeType::Model => Style::new().green(),
                NodeType::Part => Style::new().magenta(),
                NodeType::Roi => Style::new().blue(),
                NodeType::Lod => Style::new().dim(),
                NodeType::Texture => Style::new().cyan(),
                NodeType::Animation => Style::new().yellow(),
            }
        }
    }
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = format!(
        "{}{}{} {}",
        prefix,
        connector,
        node.node_type.icon(),
        style.apply_to(&node.name)
    );
    if let Some(size) = node.size {
        line.push_str(&format!(" ({})", format_bytes(size)));
    }
    output.push_str(&line);
    output.push('\n');

    let child_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}{}", prefix, if is_last { "    " } else { "│   " })
    };
    let detail_prefix = format!("{child_prefix}    ");

    if options.show_metadata {
        let meta_style = Style::new().dim();
        for (key, value) in &node.metadata {
            output.push_str(&format!(
                "{}🏷️  {}: {}\n",
                detail_prefix,
                meta_style.apply_to(key),
                value
            ));
        }
    }

    for ext_ref in &node.external_refs {
        output.push_str(&format!(
            "{}└─→ {} {}\n",
            detail_prefix,
            ext_ref.icon(),
            ext_ref.style(options.no_color).apply_to(&ext_ref.name)
        ));
    }

    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(
            child,
            output,
            &child_prefix,
            is_last_child,
            depth + 1,
            options,
        );
    }
}
