use super::OwnershipTree;

/// Connector drawn before every sibling except the last.
const BRANCH: &str = "├─ ";
/// Connector drawn before the last sibling.
const LAST_BRANCH: &str = "└─ ";
/// Indent below a sibling that has more siblings after it.
const CONTINUATION: &str = "│ ";
/// Indent below the last sibling.
const BLANK: &str = "  ";

/// Render an ownership tree as box-drawing lines.
///
/// With `is_root` set the top level is drawn flush, with no connector and no
/// extra indent for its children; every level below is indented.
pub fn render(tree: &OwnershipTree<'_>, is_root: bool, line_prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(tree, is_root, line_prefix, &mut lines);
    lines
}

fn render_into(tree: &OwnershipTree<'_>, is_root: bool, line_prefix: &str, lines: &mut Vec<String>) {
    let nodes = tree.nodes();
    let count = nodes.len();

    for (index, node) in nodes.into_iter().enumerate() {
        let last = index + 1 == count;
        let (connector, indent) = match (is_root, last) {
            (true, _) => ("", ""),
            (false, false) => (BRANCH, CONTINUATION),
            (false, true) => (LAST_BRANCH, BLANK),
        };

        lines.push(format!("{}{}{}", line_prefix, connector, node.component));

        let child_prefix = format!("{}{}", line_prefix, indent);
        render_into(&node.children, false, &child_prefix, lines);
    }
}
