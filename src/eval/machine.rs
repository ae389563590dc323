//! The abstract evaluator
//!
//! Each import/export/module/class syntax form is a thin driver over the
//! environment/store protocol and the path resolver. Evaluation is
//! single-threaded and cooperative: within one module, statements run in
//! source order; bindings become visible to subsequent statements as soon
//! as they are made; recursive declarations see their own address through
//! the two-phase letrec protocol before their value exists.

use crate::config::AnalysisConfig;
use crate::domain::Domain;
use crate::eval::modules::{ModuleRecord, ModuleSource, ModuleTable};
use crate::name::Name;
use crate::resolve::path::{ImportPath, ModuleInfo, ModulePath};
use crate::resolve::resolver::{
    ModuleOracle, ResolutionFailure, Resolver, DECLARATION_EXTENSIONS, SOURCE_EXTENSIONS,
};
use crate::scope::env::Environment;
use crate::scope::exports::{ExportEntry, ExportTable};
use crate::scope::store::{Address, Store};
use crate::syntax::{strip_quotes, Node, SyntaxKind};
use crate::term::{BoundTerm, Term};
use crate::{Error, Result};

/// Recovery hook for resolution failures.
///
/// Resolution failures are resumable: before raising, the evaluator offers
/// the failure here, and a host strategy may supply a substitute module
/// path and let evaluation continue with best-effort partial results.
pub trait Recovery {
    fn substitute(&self, failure: &ResolutionFailure) -> Option<ModulePath>;
}

/// Propagate every resolution failure as an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecovery;

impl Recovery for NoRecovery {
    fn substitute(&self, _failure: &ResolutionFailure) -> Option<ModulePath> {
        None
    }
}

/// Substitute a synthetic stand-in path for every unresolvable import. The
/// stand-in has no source and loads as an empty module.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownModule;

impl Recovery for UnknownModule {
    fn substitute(&self, failure: &ResolutionFailure) -> Option<ModulePath> {
        Some(ModulePath::unknown(&failure.specifier))
    }
}

/// Evaluation state for one module currently on the stack.
struct ModuleCtx {
    path: ModulePath,
    env: Environment,
    exports: ExportTable,
}

impl ModuleCtx {
    fn new(path: ModulePath) -> Self {
        Self {
            path,
            env: Environment::new(),
            exports: ExportTable::new(),
        }
    }
}

/// The abstract interpreter.
///
/// Generic over the value domain, the module existence oracle, and the
/// module source provider, so hosts choose the interpretation strategy and
/// the world it runs against.
pub struct Evaluator<D: Domain, O, S> {
    domain: D,
    resolver: Resolver<O>,
    sources: S,
    config: AnalysisConfig,
    recovery: Box<dyn Recovery>,
    store: Store<D::Value>,
    table: ModuleTable,
    stack: Vec<ModuleCtx>,
}

impl<D: Domain, O: ModuleOracle, S: ModuleSource> Evaluator<D, O, S> {
    /// Create an evaluator with default policies and no recovery
    pub fn new(domain: D, resolver: Resolver<O>, sources: S) -> Self {
        Self {
            domain,
            resolver,
            sources,
            config: AnalysisConfig::default(),
            recovery: Box::new(NoRecovery),
            store: Store::new(),
            table: ModuleTable::new(),
            stack: Vec::new(),
        }
    }

    /// Set the analysis policies
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a resolution recovery strategy
    pub fn with_recovery(mut self, recovery: impl Recovery + 'static) -> Self {
        self.recovery = Box::new(recovery);
        self
    }

    /// The shared value store
    pub fn store(&self) -> &Store<D::Value> {
        &self.store
    }

    /// Modules evaluated so far
    pub fn modules(&self) -> &ModuleTable {
        &self.table
    }

    /// Evaluate a module (and, transitively, everything it imports),
    /// returning its bindings and export table.
    pub fn analyze(&mut self, path: &ModulePath) -> Result<ModuleRecord> {
        self.require(path)
    }

    /// Load a module, memoized per path. A re-entrant require for a module
    /// still on the evaluation stack observes its partially populated
    /// bindings instead of re-entering evaluation.
    pub fn require(&mut self, path: &ModulePath) -> Result<ModuleRecord> {
        if let Some(record) = self.table.get(path) {
            return Ok(record.clone());
        }
        if let Some(in_progress) = self.stack.iter().find(|ctx| &ctx.path == path) {
            tracing::debug!("circular require of {}; observing partial bindings", path);
            return Ok(ModuleRecord {
                bindings: in_progress.env.module_frame().clone(),
                exports: in_progress.exports.clone(),
            });
        }
        let Some(tree) = self.sources.load(path) else {
            tracing::debug!("no source for {}; treating as empty module", path);
            let record = ModuleRecord::default();
            self.table.insert(path.clone(), record.clone());
            return Ok(record);
        };

        tracing::debug!("evaluating module {}", path);
        self.stack.push(ModuleCtx::new(path.clone()));
        let outcome = self.eval(&tree);
        let ctx = match self.stack.pop() {
            Some(ctx) => ctx,
            None => ModuleCtx::new(path.clone()),
        };
        // a failed module aborts its own evaluation, not the whole run
        outcome?;
        let record = ModuleRecord {
            bindings: ctx.env.into_module_frame(),
            exports: ctx.exports,
        };
        self.table.insert(path.clone(), record.clone());
        Ok(record)
    }

    /// Evaluate one syntax node to an abstract value.
    pub fn eval(&mut self, node: &Node) -> Result<D::Value> {
        match node.kind {
            SyntaxKind::Statements => {
                let mut last = self.domain.unit();
                for child in &node.children {
                    last = self.eval(child)?;
                }
                Ok(last)
            }
            SyntaxKind::Identifier => match &node.name {
                Some(name) => Ok(self.deref(name)),
                None => Ok(self.domain.unit()),
            },
            SyntaxKind::BooleanLiteral => {
                Ok(self.domain.boolean(node.literal.as_deref() == Some("true")))
            }
            SyntaxKind::StringLiteral => Ok(self
                .domain
                .string(strip_quotes(node.literal.as_deref().unwrap_or("")))),
            SyntaxKind::Assignment => self.eval_assignment(node),
            SyntaxKind::Function => self.eval_function(node),
            SyntaxKind::Call => self.eval_call(node),
            SyntaxKind::Class => self.eval_class(node),
            SyntaxKind::Module | SyntaxKind::InternalModule => self.eval_module_decl(node),
            SyntaxKind::Import => self.eval_import(node),
            SyntaxKind::QualifiedAliasedImport => self.eval_aliased_import(node),
            SyntaxKind::SideEffectImport => self.eval_side_effect_import(node),
            SyntaxKind::QualifiedExport => self.eval_qualified_export(node),
            SyntaxKind::QualifiedExportFrom => self.eval_export_from(node),
            SyntaxKind::DefaultExport => self.eval_default_export(node),
            SyntaxKind::Require => self.eval_require(node),
            // the inert catalog: structural traversal only
            _ => {
                for child in &node.children {
                    self.eval(child)?;
                }
                Ok(self.domain.unit())
            }
        }
    }

    // ---- statement and expression forms ----

    fn eval_assignment(&mut self, node: &Node) -> Result<D::Value> {
        let name = binder_name(node)?;
        let address = self.lookup_or_alloc(&name);
        let value = match node.children.first() {
            Some(rhs) => self.eval(rhs)?,
            None => self.domain.unit(),
        };
        self.store.assign(address, value.clone());
        Ok(value)
    }

    fn eval_function(&mut self, node: &Node) -> Result<D::Value> {
        match node.declared_name() {
            Some(name) => {
                let (value, _) = self.letrec(&name, |ev, _| Ok(ev.build_closure(node)))?;
                Ok(value)
            }
            None => Ok(self.build_closure(node)),
        }
    }

    /// Curry the parameter list into nested single-binder closures.
    fn build_closure(&mut self, node: &Node) -> D::Value {
        let params: Vec<Name> = node
            .children
            .iter()
            .take_while(|child| child.kind == SyntaxKind::Identifier)
            .filter_map(|child| child.name.clone())
            .collect();
        let mut term = match node
            .children
            .iter()
            .find(|child| child.kind == SyntaxKind::Statements)
        {
            Some(body) => self.lower(body),
            None => Term::Node(SyntaxKind::Statements, Vec::new()),
        };
        for param in params.iter().skip(1).rev() {
            term = Term::Lam(
                Some(param.clone()),
                Box::new(BoundTerm::abstracting(param, term)),
            );
        }
        match params.first() {
            Some(param) => self
                .domain
                .closure(Some(param.clone()), BoundTerm::abstracting(param, term)),
            None => self.domain.closure(None, BoundTerm::constant(term)),
        }
    }

    fn eval_call(&mut self, node: &Node) -> Result<D::Value> {
        let Some((callee, args)) = node.children.split_first() else {
            return Ok(self.domain.unit());
        };
        let mut value = self.eval(callee)?;
        let mut arg_values = Vec::with_capacity(args.len().max(1));
        for arg in args {
            arg_values.push(self.eval(arg)?);
        }
        if arg_values.is_empty() {
            arg_values.push(self.domain.unit());
        }
        for arg_value in arg_values {
            match self.domain.closure_body(&value) {
                Some(body) => {
                    let opened = body.instantiate(&arg_value);
                    value = self.eval_term(&opened)?;
                }
                None => {
                    tracing::debug!("application of a non-closure value");
                    value = self.domain.unit();
                    break;
                }
            }
        }
        Ok(value)
    }

    fn eval_class(&mut self, node: &Node) -> Result<D::Value> {
        let name = binder_name(node)?;
        let (heritage, body) = match node.children.split_last() {
            Some((last, rest)) if last.kind == SyntaxKind::Statements => (rest, Some(last)),
            _ => (node.children.as_slice(), None),
        };
        let (value, _) = self.letrec(&name, |ev, address| {
            // heritage expressions first, in declaration order
            for parent in heritage {
                ev.eval(parent)?;
            }
            ev.current().env.push_frame();
            let result = match body {
                Some(statements) => ev.eval_namespace_body(&statements.children, &name, address),
                None => ev.eval_namespace_body(&[], &name, address),
            };
            ev.current().env.pop_frame();
            result
        })?;
        Ok(value)
    }

    fn eval_module_decl(&mut self, node: &Node) -> Result<D::Value> {
        let name = binder_name(node)?;
        let (value, _) = self.letrec(&name, |ev, address| {
            ev.current().env.push_frame();
            let result = ev.eval_namespace_body(&node.children, &name, address);
            ev.current().env.pop_frame();
            result
        })?;
        Ok(value)
    }

    fn eval_namespace_body(
        &mut self,
        statements: &[Node],
        name: &Name,
        address: Address,
    ) -> Result<D::Value> {
        for statement in statements {
            self.eval(statement)?;
        }
        Ok(self.make_namespace(name, address))
    }

    // ---- import and export forms ----

    fn eval_import(&mut self, node: &Node) -> Result<D::Value> {
        let record = self.require_specifier(node, DECLARATION_EXTENSIONS)?;
        let imported = if node.pairs.is_empty() {
            record.bindings.clone()
        } else {
            record.bindings.overwrite(&node.pairs)
        };
        let bindings: Vec<(Name, Address)> = imported.iter().cloned().collect();
        self.current().env.extend(bindings);
        Ok(self.domain.unit())
    }

    fn eval_aliased_import(&mut self, node: &Node) -> Result<D::Value> {
        let record = self.require_specifier(node, DECLARATION_EXTENSIONS)?;
        let alias = binder_name(node)?;
        self.bind_namespace(&alias, &record)?;
        Ok(self.domain.unit())
    }

    fn eval_side_effect_import(&mut self, node: &Node) -> Result<D::Value> {
        self.require_specifier(node, DECLARATION_EXTENSIONS)?;
        Ok(self.domain.unit())
    }

    fn eval_qualified_export(&mut self, node: &Node) -> Result<D::Value> {
        // pure alias bookkeeping: no storage address yet
        for (name, alias) in &node.pairs {
            self.export_entry(name, alias, None)?;
        }
        Ok(self.domain.unit())
    }

    fn eval_export_from(&mut self, node: &Node) -> Result<D::Value> {
        let literal = node.literal.as_deref().unwrap_or("");
        let path = self.resolve_specifier(literal, DECLARATION_EXTENSIONS)?;
        let record = self.require(&path)?;
        for (name, alias) in &node.pairs {
            match record.bindings.lookup(name) {
                Some(address) => self.export_entry(name, alias, Some(address))?,
                None => {
                    return Err(Error::ExportResolution {
                        name: name.clone(),
                        module: path.clone(),
                    })
                }
            }
        }
        Ok(self.domain.unit())
    }

    fn eval_default_export(&mut self, node: &Node) -> Result<D::Value> {
        let subject = node.children.first().ok_or(Error::DefaultExport)?;
        let name = subject.declared_name().ok_or(Error::DefaultExport)?;
        let address = self.lookup_or_alloc(&name);
        let value = self.eval(subject)?;
        self.store.assign(address, value);
        self.export_entry(&name, &name, Some(address))?;
        self.export_entry(&name, &Name::new("default"), Some(address))?;
        Ok(self.domain.unit())
    }

    fn eval_require(&mut self, node: &Node) -> Result<D::Value> {
        let record = self.require_specifier(node, SOURCE_EXTENSIONS)?;
        if let Some(alias) = node.declared_name() {
            self.bind_namespace(&alias, &record)?;
        }
        Ok(self.domain.unit())
    }

    // ---- environment/store protocol ----

    fn current(&mut self) -> &mut ModuleCtx {
        if self.stack.is_empty() {
            self.stack.push(ModuleCtx::new(ModulePath::new("<host>")));
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn current_path(&self) -> ModulePath {
        self.stack
            .last()
            .map(|ctx| ctx.path.clone())
            .unwrap_or_else(|| ModulePath::new("<host>"))
    }

    /// Existing binding's address, or a fresh allocation bound in the
    /// current frame - the hook recursive definitions hang off.
    fn lookup_or_alloc(&mut self, name: &Name) -> Address {
        match self.current().env.lookup(name) {
            Some(address) => address,
            None => {
                let address = self.store.alloc();
                self.current().env.bind(name.clone(), address);
                address
            }
        }
    }

    /// Two-phase recursive binding: reserve and bind the address first, run
    /// the body (self-references resolve to the reserved address), assign
    /// the computed value last.
    fn letrec(
        &mut self,
        name: &Name,
        body: impl FnOnce(&mut Self, Address) -> Result<D::Value>,
    ) -> Result<(D::Value, Address)> {
        let address = self.lookup_or_alloc(name);
        let value = body(self, address)?;
        self.store.assign(address, value.clone());
        Ok((value, address))
    }

    /// Capture the innermost frame's bindings as a record and assign it at
    /// `address`: the first-class value for "everything declared inside
    /// this module/class body".
    fn make_namespace(&mut self, name: &Name, address: Address) -> D::Value {
        let members: Vec<(Name, Address)> = self.current().env.head().iter().cloned().collect();
        tracing::debug!("namespace '{}' captures {} members", name, members.len());
        let fields = members
            .into_iter()
            .map(|(member, slot)| {
                let value = match self.store.get(slot) {
                    Some(value) => value.clone(),
                    None => {
                        tracing::debug!("uninitialized member '{}' read as unit", member);
                        self.domain.unit()
                    }
                };
                (member, value)
            })
            .collect();
        let namespace = self.domain.record(fields);
        self.store.assign(address, namespace.clone());
        namespace
    }

    /// Bind a whole imported module under one name as a namespace record.
    fn bind_namespace(&mut self, alias: &Name, record: &ModuleRecord) -> Result<D::Value> {
        let (value, _) = self.letrec(alias, |ev, address| {
            ev.current().env.push_frame();
            let imported: Vec<(Name, Address)> = record.bindings.iter().cloned().collect();
            ev.current().env.extend(imported);
            let namespace = ev.make_namespace(alias, address);
            ev.current().env.pop_frame();
            Ok(namespace)
        })?;
        Ok(value)
    }

    fn export_entry(&mut self, local: &Name, public: &Name, address: Option<Address>) -> Result<()> {
        let policy = self.config.export_collisions;
        let entry = ExportEntry {
            local: local.clone(),
            address,
        };
        self.current().exports.insert(public.clone(), entry, policy)
    }

    /// Read a name: address lookup, then store read. Unbound names and
    /// uninitialized slots read as unit with a diagnostic - never an error.
    fn deref(&mut self, name: &Name) -> D::Value {
        let address = self.current().env.lookup(name);
        match address {
            Some(address) => match self.store.get(address) {
                Some(value) => value.clone(),
                None => {
                    tracing::debug!("read of uninitialized slot for '{}' yields unit", name);
                    self.domain.unit()
                }
            },
            None => {
                tracing::debug!("unbound name '{}' yields unit", name);
                self.domain.unit()
            }
        }
    }

    // ---- resolution ----

    fn require_specifier(&mut self, node: &Node, extensions: &[&str]) -> Result<ModuleRecord> {
        let literal = node.literal.as_deref().unwrap_or("");
        let path = self.resolve_specifier(literal, extensions)?;
        self.require(&path)
    }

    fn resolve_specifier(&mut self, literal: &str, extensions: &[&str]) -> Result<ModulePath> {
        let import = ImportPath::from_quoted(literal);
        let info = ModuleInfo {
            path: self.current_path(),
        };
        match self.resolver.resolve(&import, &info, extensions) {
            Ok(path) => Ok(path),
            Err(failure) => match self.recovery.substitute(&failure) {
                Some(substitute) => {
                    tracing::debug!("recovered import '{}' as {}", failure.specifier, substitute);
                    Ok(substitute)
                }
                None => Err(Error::Resolution(failure)),
            },
        }
    }

    /// Evaluate an instantiated closure-body term.
    fn eval_term(&mut self, term: &Term<D::Value>) -> Result<D::Value> {
        match term {
            Term::Var(name) => Ok(self.deref(name)),
            Term::Bound(_) => {
                tracing::debug!("dangling bound variable yields unit");
                Ok(self.domain.unit())
            }
            Term::Val(value) => Ok(value.clone()),
            Term::Lam(name, body) => Ok(self.domain.closure(name.clone(), (**body).clone())),
            Term::Node(SyntaxKind::Statements, subterms) => {
                let mut last = self.domain.unit();
                for subterm in subterms {
                    last = self.eval_term(subterm)?;
                }
                Ok(last)
            }
            Term::Node(_, subterms) => {
                for subterm in subterms {
                    self.eval_term(subterm)?;
                }
                Ok(self.domain.unit())
            }
        }
    }

    /// Lower a syntax subtree into a closure-body term.
    fn lower(&self, node: &Node) -> Term<D::Value> {
        match node.kind {
            SyntaxKind::Identifier => match &node.name {
                Some(name) => Term::Var(name.clone()),
                None => Term::Node(SyntaxKind::Identifier, Vec::new()),
            },
            SyntaxKind::StringLiteral => Term::Val(
                self.domain
                    .string(strip_quotes(node.literal.as_deref().unwrap_or(""))),
            ),
            SyntaxKind::BooleanLiteral => {
                Term::Val(self.domain.boolean(node.literal.as_deref() == Some("true")))
            }
            _ => Term::Node(
                node.kind,
                node.children.iter().map(|child| self.lower(child)).collect(),
            ),
        }
    }
}

/// Derive the binder name a declaration form requires: the declared name
/// when present, otherwise the single free variable of the subterm.
fn binder_name(node: &Node) -> Result<Name> {
    match node.declared_name() {
        Some(name) => Ok(name),
        None => node.free_variable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AbstractDomain;
    use crate::eval::modules::MemorySources;
    use crate::resolve::path::PackageInfo;
    use crate::resolve::resolver::MemoryOracle;
    use crate::scope::exports::ExportCollisionPolicy;
    use crate::value::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn evaluator(
        sources: MemorySources,
        files: &[&str],
    ) -> Evaluator<AbstractDomain, MemoryOracle, MemorySources> {
        let oracle = MemoryOracle::new(files.iter().copied());
        Evaluator::new(AbstractDomain, Resolver::new(oracle, PackageInfo::new()), sources)
    }

    fn assignment(name: &str, rhs: Node) -> Node {
        Node::new(SyntaxKind::Assignment)
            .with_name(name)
            .with_children(vec![rhs])
    }

    fn import(specifier: &str, pairs: Vec<(&str, &str)>) -> Node {
        Node::new(SyntaxKind::Import)
            .with_literal(format!("\"{}\"", specifier))
            .with_pairs(
                pairs
                    .into_iter()
                    .map(|(a, b)| (Name::new(a), Name::new(b)))
                    .collect(),
            )
    }

    struct CountingSources {
        inner: MemorySources,
        loads: Rc<RefCell<Vec<ModulePath>>>,
    }

    impl ModuleSource for CountingSources {
        fn load(&self, path: &ModulePath) -> Option<Node> {
            self.loads.borrow_mut().push(path.clone());
            self.inner.load(path)
        }
    }

    #[test]
    fn test_require_is_memoized() {
        let lib = Node::statements(vec![
            assignment("a", Node::boolean(true)),
            Node::new(SyntaxKind::QualifiedExport)
                .with_pairs(vec![(Name::new("a"), Name::new("a"))]),
        ]);
        let sources = MemorySources::new()
            .with("/p/lib.ts", lib)
            .with("/p/x.ts", Node::statements(vec![import("./lib", vec![])]))
            .with("/p/y.ts", Node::statements(vec![import("./lib", vec![])]));
        let loads = Rc::new(RefCell::new(Vec::new()));
        let counting = CountingSources {
            inner: sources,
            loads: Rc::clone(&loads),
        };
        let oracle = MemoryOracle::new(["/p/lib.ts"]);
        let mut ev = Evaluator::new(
            AbstractDomain,
            Resolver::new(oracle, PackageInfo::new()),
            counting,
        );

        ev.analyze(&ModulePath::new("/p/x.ts")).unwrap();
        ev.analyze(&ModulePath::new("/p/y.ts")).unwrap();

        let lib_loads = loads
            .borrow()
            .iter()
            .filter(|p| **p == ModulePath::new("/p/lib.ts"))
            .count();
        assert_eq!(lib_loads, 1);

        let record = ev.modules().get(&ModulePath::new("/p/lib.ts")).unwrap();
        assert_eq!(record.exports.len(), 1);
    }

    #[test]
    fn test_import_renaming_aliases_same_address() {
        let lib = Node::statements(vec![assignment("a", Node::string("\"v\""))]);
        let main = Node::statements(vec![import("./lib", vec![("a", "b")])]);
        let sources = MemorySources::new()
            .with("/p/lib.ts", lib)
            .with("/p/main.ts", main);
        let mut ev = evaluator(sources, &["/p/lib.ts"]);

        let record = ev.analyze(&ModulePath::new("/p/main.ts")).unwrap();
        let lib_record = ev.modules().get(&ModulePath::new("/p/lib.ts")).unwrap();

        let b = record.bindings.lookup(&Name::new("b")).unwrap();
        let a = lib_record.bindings.lookup(&Name::new("a")).unwrap();
        assert_eq!(a, b);
        assert!(record.bindings.lookup(&Name::new("a")).is_none());
        assert_eq!(ev.store().get(b), Some(&Value::String("v".into())));
    }

    #[test]
    fn test_letrec_self_reference() {
        let module = Node::new(SyntaxKind::Module)
            .with_name("M")
            .with_children(vec![
                assignment("x", Node::boolean(true)),
                // self-reference before the namespace is complete
                assignment("y", Node::ident("M")),
            ]);
        let sources =
            MemorySources::new().with("/p/m.ts", Node::statements(vec![module]));
        let mut ev = evaluator(sources, &[]);

        let record = ev.analyze(&ModulePath::new("/p/m.ts")).unwrap();
        let address = record.bindings.lookup(&Name::new("M")).unwrap();
        // afterwards the name resolves to the fully constructed namespace
        let namespace = ev.store().get(address).unwrap();
        assert_eq!(
            namespace,
            &Value::Record(vec![
                (Name::new("x"), Value::Bool(true)),
                // the in-flight read observed the designated placeholder
                (Name::new("y"), Value::Unit),
            ])
        );
    }

    #[test]
    fn test_export_collision_last_writer_wins() {
        let tree = Node::statements(vec![
            assignment("one", Node::boolean(true)),
            assignment("two", Node::boolean(false)),
            Node::new(SyntaxKind::QualifiedExport)
                .with_pairs(vec![(Name::new("one"), Name::new("shared"))]),
            Node::new(SyntaxKind::QualifiedExport)
                .with_pairs(vec![(Name::new("two"), Name::new("shared"))]),
        ]);
        let sources = MemorySources::new().with("/p/m.ts", tree);
        let mut ev = evaluator(sources, &[]);

        let record = ev.analyze(&ModulePath::new("/p/m.ts")).unwrap();
        assert_eq!(record.exports.len(), 1);
        let entry = record.exports.lookup(&Name::new("shared")).unwrap();
        assert_eq!(entry.local, Name::new("two"));
        // qualified exports are alias bookkeeping only
        assert!(entry.address.is_none());
    }

    #[test]
    fn test_export_collision_error_policy() {
        let tree = Node::statements(vec![
            Node::new(SyntaxKind::QualifiedExport)
                .with_pairs(vec![(Name::new("one"), Name::new("shared"))]),
            Node::new(SyntaxKind::QualifiedExport)
                .with_pairs(vec![(Name::new("two"), Name::new("shared"))]),
        ]);
        let sources = MemorySources::new().with("/p/m.ts", tree);
        let config = AnalysisConfig {
            export_collisions: ExportCollisionPolicy::Error,
            ..AnalysisConfig::default()
        };
        let mut ev = evaluator(sources, &[]).with_config(config);

        let result = ev.analyze(&ModulePath::new("/p/m.ts"));
        assert!(matches!(result, Err(Error::ExportCollision(name)) if name == Name::new("shared")));
    }

    #[test]
    fn test_reexport_resolves_address() {
        let lib = Node::statements(vec![assignment("a", Node::boolean(true))]);
        let main = Node::statements(vec![Node::new(SyntaxKind::QualifiedExportFrom)
            .with_literal("\"./lib\"")
            .with_pairs(vec![(Name::new("a"), Name::new("b"))])]);
        let sources = MemorySources::new()
            .with("/p/lib.ts", lib)
            .with("/p/main.ts", main);
        let mut ev = evaluator(sources, &["/p/lib.ts"]);

        let record = ev.analyze(&ModulePath::new("/p/main.ts")).unwrap();
        let entry = record.exports.lookup(&Name::new("b")).unwrap();
        assert_eq!(entry.local, Name::new("a"));
        let lib_record = ev.modules().get(&ModulePath::new("/p/lib.ts")).unwrap();
        assert_eq!(entry.address, lib_record.bindings.lookup(&Name::new("a")));
    }

    #[test]
    fn test_reexport_of_missing_name_fails() {
        let lib = Node::statements(vec![]);
        let main = Node::statements(vec![Node::new(SyntaxKind::QualifiedExportFrom)
            .with_literal("\"./lib\"")
            .with_pairs(vec![(Name::new("ghost"), Name::new("g"))])]);
        let sources = MemorySources::new()
            .with("/p/lib.ts", lib)
            .with("/p/main.ts", main);
        let mut ev = evaluator(sources, &["/p/lib.ts"]);

        let result = ev.analyze(&ModulePath::new("/p/main.ts"));
        assert!(
            matches!(result, Err(Error::ExportResolution { name, .. }) if name == Name::new("ghost"))
        );
    }

    #[test]
    fn test_default_export_registers_both_names() {
        let function = Node::new(SyntaxKind::Function)
            .with_name("f")
            .with_children(vec![Node::statements(vec![])]);
        let tree = Node::statements(vec![
            Node::new(SyntaxKind::DefaultExport).with_children(vec![function])
        ]);
        let sources = MemorySources::new().with("/p/m.ts", tree);
        let mut ev = evaluator(sources, &[]);

        let record = ev.analyze(&ModulePath::new("/p/m.ts")).unwrap();
        let by_name = record.exports.lookup(&Name::new("f")).unwrap();
        let by_default = record.exports.lookup(&Name::new("default")).unwrap();
        assert_eq!(by_name.address, by_default.address);
        assert!(by_name.address.is_some());
        // and the declared name is bound locally
        assert_eq!(record.bindings.lookup(&Name::new("f")), by_name.address);
    }

    #[test]
    fn test_default_export_without_name_fails() {
        let tree = Node::statements(vec![
            Node::new(SyntaxKind::DefaultExport).with_children(vec![Node::string("\"x\"")])
        ]);
        let sources = MemorySources::new().with("/p/m.ts", tree);
        let mut ev = evaluator(sources, &[]);

        let result = ev.analyze(&ModulePath::new("/p/m.ts"));
        assert!(matches!(result, Err(Error::DefaultExport)));
    }

    #[test]
    fn test_namespace_import_materializes_record() {
        let lib = Node::statements(vec![
            assignment("a", Node::boolean(true)),
            assignment("b", Node::string("\"s\"")),
        ]);
        let main = Node::statements(vec![Node::new(SyntaxKind::QualifiedAliasedImport)
            .with_name("ns")
            .with_literal("\"./lib\"")]);
        let sources = MemorySources::new()
            .with("/p/lib.ts", lib)
            .with("/p/main.ts", main);
        let mut ev = evaluator(sources, &["/p/lib.ts"]);

        let record = ev.analyze(&ModulePath::new("/p/main.ts")).unwrap();
        let ns = record.bindings.lookup(&Name::new("ns")).unwrap();
        assert_eq!(
            ev.store().get(ns),
            Some(&Value::Record(vec![
                (Name::new("a"), Value::Bool(true)),
                (Name::new("b"), Value::String("s".into())),
            ]))
        );
    }

    #[test]
    fn test_side_effect_import_forces_evaluation() {
        let lib = Node::statements(vec![assignment("a", Node::boolean(true))]);
        let main = Node::statements(vec![
            Node::new(SyntaxKind::SideEffectImport).with_literal("\"./lib\"")
        ]);
        let sources = MemorySources::new()
            .with("/p/lib.ts", lib)
            .with("/p/main.ts", main);
        let mut ev = evaluator(sources, &["/p/lib.ts"]);

        let record = ev.analyze(&ModulePath::new("/p/main.ts")).unwrap();
        assert!(record.bindings.is_empty());
        assert!(ev.modules().contains(&ModulePath::new("/p/lib.ts")));
    }

    #[test]
    fn test_circular_require_observes_partial_bindings() {
        // a binds a1, then imports b, which imports a back
        let a = Node::statements(vec![
            assignment("a1", Node::boolean(true)),
            import("./b", vec![]),
        ]);
        let b = Node::statements(vec![import("./a", vec![("a1", "from_a")])]);
        let sources = MemorySources::new().with("/p/a.ts", a).with("/p/b.ts", b);
        let mut ev = evaluator(sources, &["/p/a.ts", "/p/b.ts"]);

        let a_record = ev.analyze(&ModulePath::new("/p/a.ts")).unwrap();
        let b_record = ev.modules().get(&ModulePath::new("/p/b.ts")).unwrap();
        assert_eq!(
            b_record.bindings.lookup(&Name::new("from_a")),
            a_record.bindings.lookup(&Name::new("a1"))
        );
    }

    #[test]
    fn test_resolution_failure_without_recovery() {
        let main = Node::statements(vec![import("./missing", vec![])]);
        let sources = MemorySources::new().with("/p/main.ts", main);
        let mut ev = evaluator(sources, &[]);

        let result = ev.analyze(&ModulePath::new("/p/main.ts"));
        assert!(matches!(result, Err(Error::Resolution(_))));
    }

    #[test]
    fn test_recovery_substitutes_unknown_module() {
        let main = Node::statements(vec![
            import("./missing", vec![]),
            assignment("after", Node::boolean(true)),
        ]);
        let sources = MemorySources::new().with("/p/main.ts", main);
        let mut ev = evaluator(sources, &[]).with_recovery(UnknownModule);

        let record = ev.analyze(&ModulePath::new("/p/main.ts")).unwrap();
        // evaluation continued past the unresolvable import
        assert!(record.bindings.lookup(&Name::new("after")).is_some());
        assert!(ev.modules().contains(&ModulePath::unknown("./missing")));
    }

    #[test]
    fn test_closure_application_substitutes_argument() {
        let function = Node::new(SyntaxKind::Function)
            .with_name("id")
            .with_children(vec![
                Node::ident("x"),
                Node::statements(vec![Node::ident("x")]),
            ]);
        let tree = Node::statements(vec![
            Node::new(SyntaxKind::Assignment)
                .with_name("id")
                .with_children(vec![function]),
            assignment(
                "r",
                Node::new(SyntaxKind::Call)
                    .with_children(vec![Node::ident("id"), Node::boolean(true)]),
            ),
        ]);
        let sources = MemorySources::new().with("/p/m.ts", tree);
        let mut ev = evaluator(sources, &[]);

        let record = ev.analyze(&ModulePath::new("/p/m.ts")).unwrap();
        let r = record.bindings.lookup(&Name::new("r")).unwrap();
        assert_eq!(ev.store().get(r), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_class_with_heritage_and_members() {
        let class = Node::new(SyntaxKind::Class)
            .with_name("C")
            .with_children(vec![
                Node::ident("Base"),
                Node::statements(vec![assignment("m", Node::boolean(false))]),
            ]);
        let tree = Node::statements(vec![
            assignment("Base", Node::boolean(true)),
            class,
        ]);
        let sources = MemorySources::new().with("/p/m.ts", tree);
        let mut ev = evaluator(sources, &[]);

        let record = ev.analyze(&ModulePath::new("/p/m.ts")).unwrap();
        let c = record.bindings.lookup(&Name::new("C")).unwrap();
        assert_eq!(
            ev.store().get(c),
            Some(&Value::Record(vec![(Name::new("m"), Value::Bool(false))]))
        );
    }

    #[test]
    fn test_inert_nodes_traverse_children() {
        // a declaration nested inside inert markup is still evaluated
        let tree = Node::statements(vec![Node::new(SyntaxKind::JsxElement)
            .with_children(vec![assignment("x", Node::boolean(true))])]);
        let sources = MemorySources::new().with("/p/m.ts", tree);
        let mut ev = evaluator(sources, &[]);

        let record = ev.analyze(&ModulePath::new("/p/m.ts")).unwrap();
        assert!(record.bindings.lookup(&Name::new("x")).is_some());
    }

    #[test]
    fn test_dynamic_require_uses_source_extensions() {
        let lib = Node::statements(vec![assignment("a", Node::boolean(true))]);
        let main = Node::statements(vec![Node::new(SyntaxKind::Require)
            .with_name("lib")
            .with_literal("\"./lib\"")]);
        let sources = MemorySources::new()
            .with("/p/lib.js", lib)
            .with("/p/main.ts", main);
        // only the plain-source candidate exists
        let mut ev = evaluator(sources, &["/p/lib.js"]);

        let record = ev.analyze(&ModulePath::new("/p/main.ts")).unwrap();
        let ns = record.bindings.lookup(&Name::new("lib")).unwrap();
        assert!(matches!(ev.store().get(ns), Some(Value::Record(_))));
    }
}
