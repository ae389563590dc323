//! Syntax representation - language-agnostic parsed trees
//!
//! Frontends for concrete languages live outside this crate; they hand the
//! evaluator a [`Node`] tree tagged with a [`SyntaxKind`]. The semantic kinds
//! (imports, exports, modules, classes, functions) each have an evaluation
//! rule; the large catalog of structurally inert kinds (types, JSX markup,
//! decorators, ambient declarations) collapses into single variants with a
//! default traverse-children evaluation.

use crate::name::Name;
use crate::{Error, Result};

/// The kind of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Carriers of evaluation semantics
    /// Reference to a name in scope
    Identifier,
    /// String literal, stored as written (quotes included)
    StringLiteral,
    /// Boolean literal
    BooleanLiteral,
    /// Ordered statement sequence; evaluates to its last statement
    Statements,
    /// Name binding or re-binding with a value
    Assignment,
    /// Function declaration or expression
    Function,
    /// Function application
    Call,
    /// Class declaration: heritage expressions followed by a body
    Class,
    /// Module declaration exposing its body as a namespace
    Module,
    /// Internal (nested) module declaration
    InternalModule,
    /// Named import: `import {a as b} from "path"`
    Import,
    /// Namespace-aliased import: `import * as ns from "path"`
    QualifiedAliasedImport,
    /// Side-effect-only import: `import "path"`
    SideEffectImport,
    /// Export of local names: `export {a as b}`
    QualifiedExport,
    /// Re-export from another module: `export {a as b} from "path"`
    QualifiedExportFrom,
    /// Default export
    DefaultExport,
    /// Dynamic same-ecosystem require, optionally bound to a name
    Require,

    // Structurally inert catalog - traversed, never interpreted
    /// Type alias declaration
    TypeAlias,
    /// Interface declaration
    Interface,
    /// Type annotation on any construct
    TypeAnnotation,
    /// Type parameter list
    TypeParameters,
    /// Property signature inside a type
    PropertySignature,
    /// Index signature inside a type
    IndexSignature,
    /// Enum declaration
    EnumDeclaration,
    /// Ambient (declare-only) declaration
    AmbientDeclaration,
    /// Decorator attached to a declaration
    Decorator,
    /// JSX element
    JsxElement,
    /// JSX fragment
    JsxFragment,
    /// JSX attribute
    JsxAttribute,
    /// Empty statement
    Empty,
}

impl SyntaxKind {
    /// Get the string representation of the syntax kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::StringLiteral => "string",
            SyntaxKind::BooleanLiteral => "boolean",
            SyntaxKind::Statements => "statements",
            SyntaxKind::Assignment => "assignment",
            SyntaxKind::Function => "function",
            SyntaxKind::Call => "call",
            SyntaxKind::Class => "class",
            SyntaxKind::Module => "module",
            SyntaxKind::InternalModule => "internal-module",
            SyntaxKind::Import => "import",
            SyntaxKind::QualifiedAliasedImport => "aliased-import",
            SyntaxKind::SideEffectImport => "side-effect-import",
            SyntaxKind::QualifiedExport => "export",
            SyntaxKind::QualifiedExportFrom => "export-from",
            SyntaxKind::DefaultExport => "default-export",
            SyntaxKind::Require => "require",
            SyntaxKind::TypeAlias => "type-alias",
            SyntaxKind::Interface => "interface",
            SyntaxKind::TypeAnnotation => "type-annotation",
            SyntaxKind::TypeParameters => "type-parameters",
            SyntaxKind::PropertySignature => "property-signature",
            SyntaxKind::IndexSignature => "index-signature",
            SyntaxKind::EnumDeclaration => "enum",
            SyntaxKind::AmbientDeclaration => "ambient",
            SyntaxKind::Decorator => "decorator",
            SyntaxKind::JsxElement => "jsx-element",
            SyntaxKind::JsxFragment => "jsx-fragment",
            SyntaxKind::JsxAttribute => "jsx-attribute",
            SyntaxKind::Empty => "empty",
        }
    }

    /// Whether this kind carries no semantics beyond structural traversal
    pub fn is_inert(&self) -> bool {
        matches!(
            self,
            SyntaxKind::TypeAlias
                | SyntaxKind::Interface
                | SyntaxKind::TypeAnnotation
                | SyntaxKind::TypeParameters
                | SyntaxKind::PropertySignature
                | SyntaxKind::IndexSignature
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::AmbientDeclaration
                | SyntaxKind::Decorator
                | SyntaxKind::JsxElement
                | SyntaxKind::JsxFragment
                | SyntaxKind::JsxAttribute
                | SyntaxKind::Empty
        )
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed syntax node.
///
/// The payload fields are optional and kind-dependent:
/// - `name`: declared name (functions, classes, modules, assignments) or the
///   referenced identifier, or the binding name of an aliased import/require
/// - `literal`: literal text as written in source, including surrounding
///   quotes for strings and import specifiers
/// - `pairs`: `(source, alias)` rename lists for import/export forms
/// - `children`: subterms; for `Class` the heritage expressions followed by
///   a `Statements` body, for `Call` the callee followed by arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: SyntaxKind,
    pub name: Option<Name>,
    pub literal: Option<String>,
    pub pairs: Vec<(Name, Name)>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new node with no payload
    pub fn new(kind: SyntaxKind) -> Self {
        Self {
            kind,
            name: None,
            literal: None,
            pairs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the declared or referenced name
    pub fn with_name(mut self, name: impl Into<Name>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the literal text
    pub fn with_literal(mut self, literal: impl Into<String>) -> Self {
        self.literal = Some(literal.into());
        self
    }

    /// Set the `(source, alias)` rename pairs
    pub fn with_pairs(mut self, pairs: Vec<(Name, Name)>) -> Self {
        self.pairs = pairs;
        self
    }

    /// Set the child nodes
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// An identifier reference
    pub fn ident(name: impl Into<Name>) -> Self {
        Self::new(SyntaxKind::Identifier).with_name(name)
    }

    /// A string literal; `text` is the source text including quotes
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(SyntaxKind::StringLiteral).with_literal(text)
    }

    /// A boolean literal
    pub fn boolean(value: bool) -> Self {
        Self::new(SyntaxKind::BooleanLiteral).with_literal(if value { "true" } else { "false" })
    }

    /// A statement sequence
    pub fn statements(children: Vec<Node>) -> Self {
        Self::new(SyntaxKind::Statements).with_children(children)
    }

    /// The declared name this node carries, if any.
    ///
    /// For an identifier this is the referenced name itself, which is what
    /// default-export derivation relies on.
    pub fn declared_name(&self) -> Option<Name> {
        self.name.clone()
    }

    /// Derive a binder name from an arbitrary subterm.
    ///
    /// Succeeds iff the subterm mentions exactly one distinct identifier
    /// (e.g. the `x` in `require(x)`); otherwise fails with
    /// [`Error::FreeVariables`] carrying everything that was found.
    pub fn free_variable(&self) -> Result<Name> {
        let mut found = Vec::new();
        self.collect_identifiers(&mut found);
        match found.as_slice() {
            [single] => Ok(single.clone()),
            _ => Err(Error::FreeVariables(found)),
        }
    }

    fn collect_identifiers(&self, out: &mut Vec<Name>) {
        if self.kind == SyntaxKind::Identifier {
            if let Some(name) = &self.name {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
        }
        for child in &self.children {
            child.collect_identifiers(out);
        }
    }
}

/// Strip the surrounding quote characters from a literal, if present.
pub(crate) fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}
