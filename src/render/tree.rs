//! Plain-text rendering of a folder view.

use crate::domain::TreeNode;

const SUMMARY_PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, Default)]
pub struct TreeRenderOptions {
    /// Stop descending below this depth (0 shows only the top level).
    pub max_depth: Option<usize>,
    pub show_summaries: bool,
}

/// Draw `nodes` beneath a `root_label/` line using box-drawing connectors.
pub fn render_tree(root_label: &str, nodes: &[TreeNode], options: &TreeRenderOptions) -> String {
    let mut lines = vec![format!("{}/", root_label.trim_end_matches('/'))];
    walk(nodes, "", 0, options, &mut lines);
    lines.join("\n")
}

fn walk(nodes: &[TreeNode], prefix: &str, depth: usize, options: &TreeRenderOptions, lines: &mut Vec<String>) {
    let total = nodes.len();
    for (idx, node) in nodes.iter().enumerate() {
        let is_last = idx + 1 == total;
        let connector = if is_last { "└── " } else { "├── " };
        let slash = if node.is_directory { "/" } else { "" };

        let mut line = format!("{}{}{}{} ({})", prefix, connector, node.name, slash, node.size);
        if options.show_summaries && !node.summary.is_empty() {
            line.push_str(": ");
            line.push_str(&preview(&node.summary));
        }
        lines.push(line);

        let within_depth = options.max_depth.map_or(true, |max| depth < max);
        if node.is_directory && within_depth {
            let extension = if is_last { "    " } else { "│   " };
            walk(&node.children, &format!("{prefix}{extension}"), depth + 1, options, lines);
        }
    }
}

fn preview(summary: &str) -> String {
    let flat = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SUMMARY_PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(SUMMARY_PREVIEW_CHARS - 3).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, children: Vec<TreeNode>, summary: &str) -> TreeNode {
        TreeNode {
            name: name.to_string(),
            absolute_path: format!("/r/{name}"),
            is_directory: !children.is_empty() || !name.contains('.'),
            size: "1.0 KB".to_string(),
            modified: "2024-01-01 00:00:00".to_string(),
            children,
            children_expanded: false,
            depth: 0,
            summary: summary.to_string(),
        }
    }

    #[test]
    fn renders_connectors_and_sizes() {
        let nodes = vec![
            node("docs", vec![node("a.txt", vec![], ""), node("b.txt", vec![], "")], ""),
            node("top.txt", vec![], ""),
        ];
        let out = render_tree("root", &nodes, &TreeRenderOptions::default());
        let expected = "root/\n\
                        ├── docs/ (1.0 KB)\n\
                        │   ├── a.txt (1.0 KB)\n\
                        │   └── b.txt (1.0 KB)\n\
                        └── top.txt (1.0 KB)";
        assert_eq!(out, expected);
    }

    #[test]
    fn depth_limit_hides_nested_entries() {
        let nodes = vec![node("docs", vec![node("a.txt", vec![], "")], "")];
        let options = TreeRenderOptions { max_depth: Some(0), show_summaries: false };
        let out = render_tree("root", &nodes, &options);
        assert!(out.contains("docs/"));
        assert!(!out.contains("a.txt"));
    }

    #[test]
    fn summaries_are_flattened_and_shortened() {
        let long = "word ".repeat(40);
        let nodes = vec![node("a.txt", vec![], "line one\nline two"), node("b.txt", vec![], &long)];
        let options = TreeRenderOptions { max_depth: None, show_summaries: true };
        let out = render_tree("root", &nodes, &options);
        assert!(out.contains("a.txt (1.0 KB): line one line two"));
        assert!(out.lines().last().unwrap().ends_with("..."));
    }
}
