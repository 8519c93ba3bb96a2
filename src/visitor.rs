use tree_sitter::Node;

use crate::construct::{Construct, Counts};

/// Walks a parsed Python tree exactly once, depth-first, and classifies each
/// node into at most one counting construct. Every node is still descended
/// into after classification so nested constructs are never missed.
pub struct CountingVisitor {
    counts: Counts,
}

impl CountingVisitor {
    pub fn new() -> Self {
        Self {
            counts: Counts::new(),
        }
    }

    /// Walk the tree rooted at `root` and return the populated counts.
    pub fn count(mut self, root: Node<'_>) -> Counts {
        self.visit(root);
        self.counts
    }

    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            "module" => {
                self.try_count_docstring(node);
            }
            "if_statement" => {
                // Handles its own children: elif/else clauses need chain logic.
                self.visit_if(node, false);
                return;
            }
            "conditional_expression" => {
                // A ternary reads as one `if` and one `else`.
                self.counts.bump(Construct::If);
                self.counts.bump(Construct::Else);
            }
            "try_statement" => self.counts.bump(Construct::Try),
            "except_clause" | "except_group_clause" => self.counts.bump(Construct::Except),
            "for_statement"
            | "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "generator_expression" => {
                // One `for` per comprehension, however many clauses it has.
                self.counts.bump(Construct::For);
            }
            "with_statement" => self.counts.bump(Construct::With),
            "return_statement" => self.counts.bump(Construct::Return),
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                self.counts.bump(Construct::Import);
            }
            "binary_operator" => {
                if let Some(op) = node.child_by_field_name("operator") {
                    if matches!(op.kind(), "+" | "-" | "*" | "/") {
                        self.counts.bump(Construct::Arithmetic);
                    }
                }
            }
            "comparison_operator" => {
                if is_single_equality_comparison(node) {
                    self.counts.bump(Construct::Logic);
                }
            }
            "boolean_operator" => {
                let is_and = node
                    .child_by_field_name("operator")
                    .map(|op| op.kind() == "and")
                    .unwrap_or(false);
                if is_and {
                    self.counts.bump(Construct::Logic);
                }
            }
            "not_operator" => self.counts.bump(Construct::Logic),
            "function_definition" | "class_definition" => {
                self.try_count_docstring_of_body(node);
                self.counts.bump(Construct::Def);
                self.counts.bump(Construct::Entity);
            }
            "assignment" => {
                self.counts.bump(Construct::Assignment);
                self.counts.bump(Construct::Entity);
            }
            "integer" | "float" | "string" => self.counts.bump(Construct::Literal),
            "concatenated_string" => {
                // Adjacent string pieces form a single literal.
                self.counts.bump(Construct::Literal);
                self.visit_concatenated_string(node);
                return;
            }
            "call" => {
                self.counts.bump(Construct::Call);
                self.count_call_arguments(node);
            }
            "subscript" => self.count_subscript_arguments(node),
            "comment" => self.counts.bump(Construct::Comment),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
    }

    /// Count an `if` statement and its clause chain.
    fn visit_if(&mut self, node: Node<'_>, as_elif: bool) {
        self.counts.bump(if as_elif {
            Construct::Elif
        } else {
            Construct::If
        });

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "elif_clause" => {
                    self.counts.bump(Construct::Elif);
                    let mut clause_cursor = child.walk();
                    for grandchild in child.named_children(&mut clause_cursor) {
                        self.visit(grandchild);
                    }
                }
                "else_clause" => self.visit_else_clause(child),
                _ => self.visit(child),
            }
        }
    }

    /// An else branch whose only statement is a nested `if` reads as the next
    /// link of an else-if chain, not as an `else` wrapping a fresh `if`.
    fn visit_else_clause(&mut self, node: Node<'_>) {
        if let Some(body) = node.child_by_field_name("body") {
            let mut statements = Vec::new();
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                if child.kind() != "comment" {
                    statements.push(child);
                }
            }

            if statements.len() == 1 && statements[0].kind() == "if_statement" {
                let mut body_cursor = body.walk();
                for child in body.named_children(&mut body_cursor) {
                    if child.kind() == "if_statement" {
                        self.visit_if(child, true);
                    } else {
                        self.visit(child);
                    }
                }
                return;
            }
        }

        self.counts.bump(Construct::Else);
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
    }

    /// Descend into a concatenated string without counting each piece again;
    /// f-string interpolations inside the pieces are still visited.
    fn visit_concatenated_string(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for piece in node.named_children(&mut cursor) {
            if piece.kind() == "string" {
                let mut piece_cursor = piece.walk();
                for child in piece.named_children(&mut piece_cursor) {
                    self.visit(child);
                }
            } else {
                self.visit(piece);
            }
        }
    }

    /// One argument per positional and per keyword argument of a call.
    fn count_call_arguments(&mut self, call: Node<'_>) {
        if let Some(arguments) = call.child_by_field_name("arguments") {
            let mut cursor = arguments.walk();
            let supplied = arguments
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .count() as u64;
            self.counts.add(Construct::Argument, supplied);
        }
    }

    /// A plain index is one argument; a slice is one argument per present bound.
    fn count_subscript_arguments(&mut self, subscript: Node<'_>) {
        let mut cursor = subscript.walk();
        for index in subscript.children_by_field_name("subscript", &mut cursor) {
            if index.kind() == "slice" {
                let mut bounds_cursor = index.walk();
                let bounds = index.named_children(&mut bounds_cursor).count() as u64;
                self.counts.add(Construct::Argument, bounds);
            } else {
                self.counts.bump(Construct::Argument);
            }
        }
    }

    fn try_count_docstring(&mut self, body_like: Node<'_>) {
        if first_statement_is_string(body_like) {
            self.counts.bump(Construct::Docstring);
        }
    }

    fn try_count_docstring_of_body(&mut self, definition: Node<'_>) {
        if let Some(body) = definition.child_by_field_name("body") {
            self.try_count_docstring(body);
        }
    }
}

impl Default for CountingVisitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether the first statement of a module or block is a bare string
/// expression, i.e. a docstring.
fn first_statement_is_string(body: Node<'_>) -> bool {
    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        if statement.kind() == "comment" {
            continue;
        }
        if statement.kind() == "expression_statement" {
            let mut statement_cursor = statement.walk();
            for expression in statement.named_children(&mut statement_cursor) {
                return matches!(expression.kind(), "string" | "concatenated_string");
            }
        }
        // Only the first real statement can be a docstring.
        return false;
    }
    false
}

/// True for a two-operand comparison whose operator is `==` or `!=`. Chained
/// comparisons and the remaining comparison operators are excluded from the
/// logic construct.
fn is_single_equality_comparison(comparison: Node<'_>) -> bool {
    let mut cursor = comparison.walk();
    let operands = comparison
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .count();
    if operands != 2 {
        return false;
    }

    let mut token_cursor = comparison.walk();
    let result = comparison
        .children(&mut token_cursor)
        .filter(|n| !n.is_named())
        .any(|n| matches!(n.kind(), "==" | "!="));
    result
}
