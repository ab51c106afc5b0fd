//! Function and class block extraction from Python source.
//!
//! The syntax tree comes from the tree-sitter producer; this module
//! only recognizes `class_definition` and `function_definition` nodes
//! and treats every other node type as transparent. Each block is keyed
//! by the dot-joined path of its enclosing class names plus its own
//! signature, which is what makes it matchable across file versions.

use std::collections::BTreeMap;

use error_set::error_set;
use tree_sitter::{Node, Tree};

error_set! {
    /// Errors from the syntax-tree producer
    ExtractError := {
        /// The grammar was rejected by the tree-sitter runtime
        #[display("Incompatible grammar: {message}")]
        IncompatibleGrammar { message: String },
        /// The producer returned no tree for the source text
        #[display("Syntax tree producer returned no tree")]
        NoTree,
    }
}

/// What a block is: a `def` or a `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Function,
    Class,
}

/// One function or class definition extracted from source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Dot-joined enclosing class names plus this block's signature
    pub key: String,
    /// Bare identifier
    pub name: String,
    /// `def <name><params>` or `class <name><superclasses?>`
    pub signature: String,
    pub kind: BlockKind,
    /// Exact source slice spanned by the node, nested members included
    pub code: String,
    /// Start byte offset into the source
    pub start_index: usize,
    /// End byte offset into the source (exclusive)
    pub end_index: usize,
}

/// Qualified key to block, one map per file version.
///
/// Built fresh per extraction and discarded after diffing. On a
/// duplicate key the last block seen wins: sibling blocks with
/// identical qualified signatures are indistinguishable and only one
/// survives.
pub type BlockMap = BTreeMap<String, Block>;

/// Extract every function and class block from `source`.
///
/// # Errors
///
/// Fails only when the syntax-tree producer does: an incompatible
/// grammar build, or a parse that returns no tree. Source text with
/// syntax errors still yields whatever definition nodes the producer
/// could recover.
pub fn extract(source: &str) -> Result<BlockMap, ExtractError> {
    let tree = parse_tree(source)?;
    let mut map = BlockMap::new();
    collect(tree.root_node(), source, &[], &mut map);
    Ok(map)
}

/// Run the syntax-tree producer on one source text.
///
/// A fresh parser is instantiated per call; the underlying library does
/// not guarantee reentrancy for a shared instance.
fn parse_tree(source: &str) -> Result<Tree, ExtractError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ExtractError::IncompatibleGrammar {
            message: e.to_string(),
        })?;
    parser.parse(source, None).ok_or(ExtractError::NoTree)
}

/// Depth-first walk. `ancestors` is the path of enclosing class names,
/// passed down immutably so every subtree sees a consistent prefix.
fn collect(node: Node<'_>, source: &str, ancestors: &[String], map: &mut BlockMap) {
    match node.kind() {
        "class_definition" => {
            let name = field_text(node, "name", source)
                .unwrap_or_else(|| "AnonymousClass".to_string());
            let mut signature = format!("class {name}");
            if let Some(superclasses) = field_text(node, "superclasses", source) {
                signature.push_str(&superclasses);
            }
            insert_block(node, source, ancestors, &name, signature, BlockKind::Class, map);

            let mut path = ancestors.to_vec();
            path.push(name);
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect(child, source, &path, map);
            }
        }
        "function_definition" => {
            let name =
                field_text(node, "name", source).unwrap_or_else(|| "anonymous".to_string());
            let parameters =
                field_text(node, "parameters", source).unwrap_or_else(|| "()".to_string());
            let signature = format!("def {name}{parameters}");
            insert_block(node, source, ancestors, &name, signature, BlockKind::Function, map);

            // Function nesting does not extend the key path; only
            // enclosing classes qualify a block's identity.
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect(child, source, ancestors, map);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect(child, source, ancestors, map);
            }
        }
    }
}

fn insert_block(
    node: Node<'_>,
    source: &str,
    ancestors: &[String],
    name: &str,
    signature: String,
    kind: BlockKind,
    map: &mut BlockMap,
) {
    let key = if ancestors.is_empty() {
        signature.clone()
    } else {
        format!("{}.{}", ancestors.join("."), signature)
    };

    map.insert(
        key.clone(),
        Block {
            key,
            name: name.to_string(),
            signature,
            kind,
            code: source[node.byte_range()].to_string(),
            start_index: node.start_byte(),
            end_index: node.end_byte(),
        },
    );
}

/// Text of a named field, sliced from the source by byte range.
fn field_text(node: Node<'_>, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| source[child.byte_range()].to_string())
}
