use indexmap::IndexMap;
use minilang_ast::Type;
use minilang_span::Symbol;

/// A single bound name: its type, mutability, and the flow-insensitive flags
/// the borrow checker needs (§3.3).
///
/// `borrowed_mut`/`borrowed_immut` are monotonic — once set they are never
/// cleared within the analysis of a function, since borrow checking here is
/// local and flow-insensitive rather than a full lifetime analysis (§4.3).
#[derive(Clone, Debug)]
pub struct VariableSymbol {
    pub name: Symbol,
    pub type_: Type,
    pub mutable: bool,
    pub initialized: bool,
    /// `false` only for a `let name;` re-declaration of an already-bound
    /// name (§4.3): `type_` holds [`Type::UNIT`] as a placeholder and must
    /// not be read until the symbol is reassigned with a declared type.
    pub type_known: bool,
    pub borrowed_mut: bool,
    pub borrowed_immut: bool,
}

impl VariableSymbol {
    pub fn new(name: Symbol, type_: Type, mutable: bool, initialized: bool) -> Self {
        Self {
            name,
            type_,
            mutable,
            initialized,
            type_known: true,
            borrowed_mut: false,
            borrowed_immut: false,
        }
    }

    /// A `let name;` shadow re-declaration of a name already bound in the
    /// current scope (§4.3): uninitialized, with no known type yet.
    pub fn unknown(name: Symbol, mutable: bool) -> Self {
        Self {
            name,
            type_: Type::UNIT,
            mutable,
            initialized: false,
            type_known: false,
            borrowed_mut: false,
            borrowed_immut: false,
        }
    }
}

/// A stack of lexical scopes. Grounded on `leo-passes`' `SymbolTable`, scaled
/// down to what MiniLang needs: no nested function declarations, so a plain
/// `Vec<IndexMap<..>>` is enough — no parent-pointer tree.
#[derive(Default)]
pub struct ScopeStack {
    scopes: Vec<IndexMap<Symbol, VariableSymbol>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: vec![IndexMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "popped the outermost scope");
    }

    /// Shadowing is permitted: inserting into the current scope always
    /// succeeds, even if an outer scope already binds the same name (§4.3).
    pub fn declare(&mut self, symbol: VariableSymbol) {
        self.scopes.last_mut().expect("scope stack is never empty").insert(symbol.name.clone(), symbol);
    }

    /// Looks up a binding, innermost scope first.
    pub fn lookup(&self, name: &Symbol) -> Option<&VariableSymbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Whether `name` is already bound in the current (innermost) scope,
    /// ignoring outer scopes — distinct from [`Self::lookup`], which searches
    /// all of them. Used by `let name;` to recognize an unknown-type
    /// re-declaration of a name already in scope (§4.3).
    pub fn declared_in_current_scope(&self, name: &Symbol) -> bool {
        self.scopes.last().expect("scope stack is never empty").contains_key(name)
    }

    pub fn lookup_mut(&mut self, name: &Symbol) -> Option<&mut VariableSymbol> {
        self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str, ty: Type) -> VariableSymbol {
        VariableSymbol::new(name.into(), ty, false, true)
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut stack = ScopeStack::new();
        stack.declare(sym("a", Type::I32));
        stack.push_scope();
        stack.declare(sym("a", Type::UNIT));
        assert_eq!(stack.lookup(&"a".into()).unwrap().type_, Type::UNIT);
        stack.pop_scope();
        assert_eq!(stack.lookup(&"a".into()).unwrap().type_, Type::I32);
    }

    #[test]
    fn lookup_misses_return_none() {
        let stack = ScopeStack::new();
        assert!(stack.lookup(&"missing".into()).is_none());
    }

    #[test]
    fn lookup_mut_allows_flagging_a_borrow() {
        let mut stack = ScopeStack::new();
        stack.declare(sym("a", Type::I32));
        stack.lookup_mut(&"a".into()).unwrap().borrowed_immut = true;
        assert!(stack.lookup(&"a".into()).unwrap().borrowed_immut);
    }
}
