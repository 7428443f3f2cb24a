use indexmap::IndexMap;
use minilang_ast::FunctionDecl;
use minilang_span::Symbol;

/// Maps every declared function name to its signature, built in pass one so
/// that calls anywhere in the program — including forward references and
/// mutual recursion — resolve regardless of declaration order (§4.3).
#[derive(Default)]
pub struct FunctionTable {
    functions: IndexMap<Symbol, FunctionDecl>,
}

impl FunctionTable {
    pub fn get(&self, name: &Symbol) -> Option<&FunctionDecl> {
        self.functions.get(name)
    }

    pub fn insert(&mut self, decl: FunctionDecl) {
        self.functions.insert(decl.name.clone(), decl);
    }

    pub fn values(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.functions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minilang_ast::FunctionExprBlock;
    use minilang_span::Span;

    fn decl(name: &str) -> FunctionDecl {
        FunctionDecl {
            name: name.into(),
            params: vec![],
            return_type: None,
            body: FunctionExprBlock { elements: vec![], span: Span::dummy() },
            span: Span::dummy(),
        }
    }

    #[test]
    fn lookup_by_name() {
        let mut table = FunctionTable::default();
        table.insert(decl("foo"));
        assert!(table.get(&"foo".into()).is_some());
        assert!(table.get(&"bar".into()).is_none());
    }
}
