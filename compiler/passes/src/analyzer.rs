use minilang_ast::{
    ArrayType, Assignment, BlockElement, ElseBranch, Expression, ForStmt, FunctionDecl,
    FunctionExprBlock, IfStmt, LoopStmt, Program, ReferenceType, ReturnStmt, Statement, Type,
    TupleIndex, TupleType, VarDecl, WhileStmt,
};
use minilang_errors::{Result, SemanticError};

use crate::{function_table::FunctionTable, symbol_table::ScopeStack, symbol_table::VariableSymbol};

/// Runs the two-pass semantic analysis of §4.3 over `program`. A fresh
/// [`Analyzer`] is constructed for every call — nothing is retained between
/// invocations, matching this crate's resolution of the symbol-reuse open
/// question (no `Symbol` data is ever shared between separate analyses).
pub fn analyze(program: &Program) -> Result<()> {
    let mut analyzer = Analyzer::new();

    // Pass one: collect every declaration so forward references and mutual
    // recursion resolve regardless of source order.
    for decl in &program.declarations {
        analyzer.functions.insert(decl.clone());
    }

    // Pass two: validate each body.
    for decl in &program.declarations {
        analyzer.analyze_function(decl)?;
    }
    Ok(())
}

struct Analyzer {
    scopes: ScopeStack,
    functions: FunctionTable,
    loop_depth: u32,
    current_return_type: Type,
    /// One frame per enclosing loop, holding the types of every direct
    /// `break <expr>;` seen so far. Pushed/popped around every loop
    /// construct so a `break` always attaches to its *innermost* loop; only
    /// [`Expression::Loop`] reads the popped frame back (a `break` inside a
    /// `while`/`for`/`loop`-statement has no observable value).
    break_types: Vec<Vec<Type>>,
}

impl Analyzer {
    fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            functions: FunctionTable::default(),
            loop_depth: 0,
            current_return_type: Type::UNIT,
            break_types: Vec::new(),
        }
    }

    fn analyze_function(&mut self, decl: &FunctionDecl) -> Result<()> {
        self.scopes.push_scope();
        for param in &decl.params {
            self.scopes.declare(VariableSymbol::new(
                param.name.clone(),
                param.type_.clone(),
                param.mutable,
                true,
            ));
        }

        let expected = decl.return_type_or_unit();
        self.current_return_type = expected.clone();
        let body_value = self.analyze_block_as_value(&decl.body)?;

        // A trailing bare expression is an implicit return: it must match the
        // declared return type exactly like an explicit `return` would. A
        // body that ends on a statement relies entirely on its explicit
        // `return`s (checked as they're visited) — there is no implicit Unit
        // check there, since the function may already have returned.
        if decl.body.tail_expr().is_some() && body_value != expected {
            return Err(SemanticError::ReturnType {
                message: format!(
                    "function '{}' is declared to return {expected} but its body evaluates to {body_value}",
                    decl.name
                ),
                span: decl.body.span,
            }
            .into());
        }

        self.scopes.pop_scope();
        Ok(())
    }

    /// Processes a value-bearing block: every element but a trailing bare
    /// expression is treated as a statement; the trailing bare expression (if
    /// any) becomes the block's value. Pushes and pops its own scope, so a
    /// `let` inside an `if`-expression arm or `loop` body never escapes it.
    fn analyze_block_as_value(&mut self, block: &FunctionExprBlock) -> Result<Type> {
        self.scopes.push_scope();
        let mut value = Type::UNIT;
        let last = block.elements.len().wrapping_sub(1);
        for (i, element) in block.elements.iter().enumerate() {
            match element {
                BlockElement::Stmt(stmt) => self.analyze_statement(stmt)?,
                BlockElement::Expr(expr) => {
                    let t = self.infer_expr_type(expr)?;
                    if i == last {
                        value = t;
                    }
                }
            }
        }
        self.scopes.pop_scope();
        Ok(value)
    }

    fn analyze_statements_in_scope(&mut self, statements: &[Statement]) -> Result<()> {
        self.scopes.push_scope();
        for stmt in statements {
            self.analyze_statement(stmt)?;
        }
        self.scopes.pop_scope();
        Ok(())
    }

    fn analyze_statement(&mut self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::VarDecl(v) => self.check_var_decl(v),
            Statement::Assignment(a) => self.check_assignment(a),
            Statement::ExprStmt(e) => {
                self.infer_expr_type(&e.expr)?;
                Ok(())
            }
            Statement::If(s) => self.check_if_stmt(s),
            Statement::While(w) => self.analyze_while(w),
            Statement::For(f) => self.analyze_for(f),
            Statement::Loop(l) => self.analyze_loop_stmt(l),
            Statement::Return(r) => self.check_return(r),
            Statement::Break(b) => {
                if self.loop_depth == 0 {
                    return Err(SemanticError::InvalidControlFlow {
                        message: "'break' used outside of a loop".into(),
                        span: b.span,
                    }
                    .into());
                }
                let t = match &b.expression {
                    Some(e) => self.infer_expr_type(e)?,
                    None => Type::UNIT,
                };
                if let Some(frame) = self.break_types.last_mut() {
                    frame.push(t);
                }
                Ok(())
            }
            Statement::Continue(c) => {
                if self.loop_depth == 0 {
                    return Err(SemanticError::InvalidControlFlow {
                        message: "'continue' used outside of a loop".into(),
                        span: c.span,
                    }
                    .into());
                }
                Ok(())
            }
            Statement::Empty(_) => Ok(()),
            Statement::Block(b) => self.analyze_statements_in_scope(&b.statements),
        }
    }

    fn check_return(&mut self, ret: &ReturnStmt) -> Result<()> {
        match &ret.expression {
            Some(e) => {
                let t = self.infer_expr_type(e)?;
                if self.current_return_type.is_unit() {
                    return Err(SemanticError::ReturnType {
                        message: "a function with no return type must not return a value".into(),
                        span: ret.span,
                    }
                    .into());
                }
                if t != self.current_return_type {
                    return Err(SemanticError::ReturnType {
                        message: format!(
                            "expected return type {}, found {t}",
                            self.current_return_type
                        ),
                        span: ret.span,
                    }
                    .into());
                }
            }
            None => {
                if !self.current_return_type.is_unit() {
                    return Err(SemanticError::ReturnType {
                        message: format!(
                            "expected return type {}, found nothing",
                            self.current_return_type
                        ),
                        span: ret.span,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn check_var_decl(&mut self, v: &VarDecl) -> Result<()> {
        let (type_, initialized) = match (&v.var_type, &v.init) {
            (Some(declared), Some(init)) => {
                let t = self.infer_expr_type(init)?;
                if &t != declared {
                    return Err(SemanticError::TypeMismatch {
                        message: format!(
                            "variable '{}' declared as {declared} but initialized with {t}",
                            v.name
                        ),
                        span: v.span,
                    }
                    .into());
                }
                (declared.clone(), true)
            }
            (Some(declared), None) => (declared.clone(), false),
            (None, Some(init)) => (self.infer_expr_type(init)?, true),
            (None, None) => {
                // `let name;` with neither annotation nor initializer is only
                // permitted as a shadowing re-declaration of a name already
                // bound in this scope — the new binding has no known type
                // until it is later assigned (§4.3).
                if self.scopes.declared_in_current_scope(&v.name) {
                    self.scopes.declare(VariableSymbol::unknown(v.name.clone(), v.mutable));
                    return Ok(());
                }
                return Err(SemanticError::GenericSemantic {
                    message: format!(
                        "variable '{}' needs either a type annotation or an initializer",
                        v.name
                    ),
                    span: v.span,
                }
                .into());
            }
        };
        self.scopes.declare(VariableSymbol::new(v.name.clone(), type_, v.mutable, initialized));
        Ok(())
    }

    fn check_assignment(&mut self, a: &Assignment) -> Result<()> {
        match &a.target {
            Expression::Identifier { name, span } => {
                let value_t = self.infer_expr_type(&a.value)?;
                let sym = self
                    .scopes
                    .lookup(name)
                    .cloned()
                    .ok_or_else(|| SemanticError::UndeclaredVariable {
                        name: name.to_string(),
                        span: *span,
                    })?;
                if !sym.mutable {
                    return Err(SemanticError::ImmutableAssignment {
                        name: name.to_string(),
                        span: *span,
                    }
                    .into());
                }
                if sym.type_ != value_t {
                    return Err(SemanticError::TypeMismatch {
                        message: format!(
                            "cannot assign {value_t} to variable '{name}' of type {}",
                            sym.type_
                        ),
                        span: a.span,
                    }
                    .into());
                }
                self.scopes.lookup_mut(name).expect("looked up above").initialized = true;
            }
            Expression::Index(idx) => {
                let target_t = self.infer_expr_type(&idx.target)?;
                if let Expression::Identifier { name, .. } = idx.target.as_ref() {
                    let sym = self.scopes.lookup(name).expect("resolved by infer_expr_type above");
                    if !sym.mutable {
                        return Err(SemanticError::ImmutableAssignment {
                            name: name.to_string(),
                            span: idx.target.span(),
                        }
                        .into());
                    }
                }
                let index_t = self.infer_expr_type(&idx.index)?;
                if index_t != Type::I32 {
                    return Err(SemanticError::TypeMismatch {
                        message: "array index must be i32".into(),
                        span: idx.index.span(),
                    }
                    .into());
                }
                let value_t = self.infer_expr_type(&a.value)?;
                match target_t {
                    Type::Array(ArrayType { inner, .. }) if *inner == value_t => {}
                    Type::Array(ArrayType { inner, .. }) => {
                        return Err(SemanticError::TypeMismatch {
                            message: format!("cannot assign {value_t} into an array of {inner}"),
                            span: a.span,
                        }
                        .into());
                    }
                    other => {
                        return Err(SemanticError::TypeMismatch {
                            message: format!("cannot index-assign into non-array type {other}"),
                            span: a.span,
                        }
                        .into());
                    }
                }
            }
            Expression::TupleAccess(ta) => match &ta.index {
                TupleIndex::Name(name) => {
                    return Err(SemanticError::GenericSemantic {
                        message: format!(
                            "tuple fields cannot be accessed by name '{name}'; use a numeric index"
                        ),
                        span: ta.span,
                    }
                    .into());
                }
                TupleIndex::Int(i) => {
                    let target_t = self.infer_expr_type(&ta.target)?;
                    if let Expression::Identifier { name, .. } = ta.target.as_ref() {
                        let sym =
                            self.scopes.lookup(name).expect("resolved by infer_expr_type above");
                        if !sym.mutable {
                            return Err(SemanticError::ImmutableAssignment {
                                name: name.to_string(),
                                span: ta.target.span(),
                            }
                            .into());
                        }
                    }
                    let value_t = self.infer_expr_type(&a.value)?;
                    match target_t {
                        Type::Tuple(TupleType { elements }) => {
                            let expected = elements.get(*i as usize).cloned().ok_or_else(|| {
                                SemanticError::GenericSemantic {
                                    message: format!("tuple index {i} is out of bounds"),
                                    span: ta.span,
                                }
                            })?;
                            if expected != value_t {
                                return Err(SemanticError::TypeMismatch {
                                    message: format!(
                                        "cannot assign {value_t} into tuple field of type {expected}"
                                    ),
                                    span: a.span,
                                }
                                .into());
                            }
                        }
                        other => {
                            return Err(SemanticError::TypeMismatch {
                                message: format!(
                                    "cannot access a field of non-tuple type {other}"
                                ),
                                span: a.span,
                            }
                            .into());
                        }
                    }
                }
            },
            Expression::Deref(d) => {
                let target_t = self.infer_expr_type(&d.operand)?;
                let value_t = self.infer_expr_type(&a.value)?;
                match target_t {
                    Type::Reference(ReferenceType { mutable: true, inner }) => {
                        if *inner != value_t {
                            return Err(SemanticError::TypeMismatch {
                                message: format!(
                                    "cannot assign {value_t} through a reference to {inner}"
                                ),
                                span: a.span,
                            }
                            .into());
                        }
                    }
                    Type::Reference(ReferenceType { mutable: false, .. }) => {
                        return Err(SemanticError::BorrowCheck {
                            message: "cannot assign through an immutable reference".into(),
                            span: a.span,
                        }
                        .into());
                    }
                    other => {
                        return Err(SemanticError::TypeMismatch {
                            message: format!("cannot dereference non-reference type {other}"),
                            span: a.span,
                        }
                        .into());
                    }
                }
            }
            other => {
                return Err(SemanticError::GenericSemantic {
                    message: "invalid assignment target".into(),
                    span: other.span(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_if_stmt(&mut self, if_stmt: &IfStmt) -> Result<()> {
        let cond_t = self.infer_expr_type(&if_stmt.condition)?;
        if cond_t != Type::I32 {
            return Err(SemanticError::TypeMismatch {
                message: "an 'if' condition must be i32".into(),
                span: if_stmt.condition.span(),
            }
            .into());
        }
        self.analyze_statements_in_scope(&if_stmt.then.statements)?;
        if let Some(branch) = &if_stmt.otherwise {
            match branch.as_ref() {
                ElseBranch::Block(b) => self.analyze_statements_in_scope(&b.statements)?,
                ElseBranch::If(nested) => self.check_if_stmt(nested)?,
            }
        }
        Ok(())
    }

    fn enter_loop(&mut self) {
        self.loop_depth += 1;
        self.break_types.push(Vec::new());
    }

    fn exit_loop(&mut self) -> Vec<Type> {
        self.loop_depth -= 1;
        self.break_types.pop().expect("enter_loop/exit_loop are paired")
    }

    fn analyze_while(&mut self, w: &WhileStmt) -> Result<()> {
        let cond_t = self.infer_expr_type(&w.condition)?;
        if cond_t != Type::I32 {
            return Err(SemanticError::TypeMismatch {
                message: "a 'while' condition must be i32".into(),
                span: w.condition.span(),
            }
            .into());
        }
        self.enter_loop();
        let result = self.analyze_statements_in_scope(&w.body.statements);
        self.exit_loop();
        result
    }

    fn analyze_for(&mut self, f: &ForStmt) -> Result<()> {
        let start_t = self.infer_expr_type(&f.start)?;
        let end_t = self.infer_expr_type(&f.end)?;
        if start_t != Type::I32 || end_t != Type::I32 {
            return Err(SemanticError::TypeMismatch {
                message: "a 'for' loop's range bounds must be i32".into(),
                span: f.span,
            }
            .into());
        }
        let var_type = f.var_type.clone().unwrap_or(Type::I32);
        self.enter_loop();
        self.scopes.push_scope();
        self.scopes.declare(VariableSymbol::new(f.var.clone(), var_type, f.mutable, true));
        let result: Result<()> = (|| {
            for stmt in &f.body.statements {
                self.analyze_statement(stmt)?;
            }
            Ok(())
        })();
        self.scopes.pop_scope();
        self.exit_loop();
        result
    }

    fn analyze_loop_stmt(&mut self, l: &LoopStmt) -> Result<()> {
        self.enter_loop();
        let result = self.analyze_statements_in_scope(&l.body.statements);
        self.exit_loop();
        result
    }

    fn infer_expr_type(&mut self, expr: &Expression) -> Result<Type> {
        match expr {
            Expression::Literal { .. } => Ok(Type::I32),
            Expression::Identifier { name, span } => {
                let sym = self.scopes.lookup(name).ok_or_else(|| {
                    SemanticError::UndeclaredVariable { name: name.to_string(), span: *span }
                })?;
                if !sym.type_known {
                    return Err(SemanticError::TypeMismatch {
                        message: format!("cannot use variable '{name}' with unknown type"),
                        span: *span,
                    }
                    .into());
                }
                if !sym.initialized {
                    return Err(SemanticError::UninitializedVariable {
                        name: name.to_string(),
                        span: *span,
                    }
                    .into());
                }
                Ok(sym.type_.clone())
            }
            Expression::Binary(b) => {
                let lt = self.infer_expr_type(&b.left)?;
                let rt = self.infer_expr_type(&b.right)?;
                if lt != Type::I32 || rt != Type::I32 {
                    return Err(SemanticError::TypeMismatch {
                        message: format!("operator '{}' requires i32 operands", b.operator),
                        span: b.span,
                    }
                    .into());
                }
                Ok(Type::I32)
            }
            // §9: the grammar never produces a unary expression, but one is
            // accepted if present — there is no operator-specific semantics
            // to apply, so its type is simply its operand's.
            Expression::Unary(u) => self.infer_expr_type(&u.argument),
            Expression::Call(c) => {
                let decl =
                    self.functions.get(&c.callee).cloned().ok_or_else(|| {
                        SemanticError::UndeclaredVariable {
                            name: c.callee.to_string(),
                            span: c.span,
                        }
                    })?;
                if decl.params.len() != c.arguments.len() {
                    return Err(SemanticError::TypeMismatch {
                        message: format!(
                            "function '{}' expects {} argument(s), found {}",
                            c.callee,
                            decl.params.len(),
                            c.arguments.len()
                        ),
                        span: c.span,
                    }
                    .into());
                }
                for (param, arg) in decl.params.iter().zip(&c.arguments) {
                    let arg_t = self.infer_expr_type(arg)?;
                    if arg_t != param.type_ {
                        return Err(SemanticError::TypeMismatch {
                            message: format!(
                                "argument '{}' of '{}' expects {}, found {arg_t}",
                                param.name, c.callee, param.type_
                            ),
                            span: arg.span(),
                        }
                        .into());
                    }
                }
                Ok(decl.return_type_or_unit())
            }
            Expression::If(if_expr) => {
                let cond_t = self.infer_expr_type(&if_expr.condition)?;
                if cond_t != Type::I32 {
                    return Err(SemanticError::TypeMismatch {
                        message: "an 'if' condition must be i32".into(),
                        span: if_expr.condition.span(),
                    }
                    .into());
                }
                let then_t = self.analyze_block_as_value(&if_expr.then)?;
                let else_t = self.analyze_block_as_value(&if_expr.otherwise)?;
                if then_t != else_t {
                    return Err(SemanticError::TypeMismatch {
                        message: format!(
                            "'if' branches have different types: {then_t} vs {else_t}"
                        ),
                        span: if_expr.span,
                    }
                    .into());
                }
                Ok(then_t)
            }
            Expression::Loop(loop_expr) => {
                self.enter_loop();
                let result = self.analyze_block_as_value(&loop_expr.body);
                let break_types = self.exit_loop();
                result?;
                match break_types.split_first() {
                    None => Ok(Type::UNIT),
                    Some((first, rest)) => {
                        if rest.iter().all(|t| t == first) {
                            Ok(first.clone())
                        } else {
                            Err(SemanticError::TypeMismatch {
                                message: "every 'break' in a loop must carry the same type".into(),
                                span: loop_expr.span,
                            }
                            .into())
                        }
                    }
                }
            }
            Expression::Ref(ref_expr) => self.infer_ref_expr(ref_expr),
            Expression::Deref(deref_expr) => {
                let t = self.infer_expr_type(&deref_expr.operand)?;
                match t {
                    Type::Reference(r) => Ok(*r.inner),
                    other => Err(SemanticError::TypeMismatch {
                        message: format!("cannot dereference non-reference type {other}"),
                        span: deref_expr.span,
                    }
                    .into()),
                }
            }
            Expression::Index(idx) => {
                let target_t = self.infer_expr_type(&idx.target)?;
                let index_t = self.infer_expr_type(&idx.index)?;
                if index_t != Type::I32 {
                    return Err(SemanticError::TypeMismatch {
                        message: "array index must be i32".into(),
                        span: idx.index.span(),
                    }
                    .into());
                }
                match target_t {
                    Type::Array(arr) => {
                        if let Expression::Literal { value, span } = idx.index.as_ref() {
                            if *value < 0 || *value as u32 >= arr.size {
                                return Err(SemanticError::GenericSemantic {
                                    message: format!(
                                        "array index {value} is out of bounds for size {}",
                                        arr.size
                                    ),
                                    span: *span,
                                }
                                .into());
                            }
                        }
                        Ok(*arr.inner)
                    }
                    other => Err(SemanticError::TypeMismatch {
                        message: format!("cannot index non-array type {other}"),
                        span: idx.span,
                    }
                    .into()),
                }
            }
            Expression::TupleAccess(ta) => {
                let target_t = self.infer_expr_type(&ta.target)?;
                match (&ta.index, target_t) {
                    (TupleIndex::Name(name), _) => Err(SemanticError::GenericSemantic {
                        message: format!(
                            "tuple fields cannot be accessed by name '{name}'; MiniLang tuples are positional"
                        ),
                        span: ta.span,
                    }
                    .into()),
                    (TupleIndex::Int(i), Type::Tuple(TupleType { elements })) => {
                        elements.get(*i as usize).cloned().ok_or_else(|| {
                            SemanticError::GenericSemantic {
                                message: format!("tuple index {i} is out of bounds"),
                                span: ta.span,
                            }
                            .into()
                        })
                    }
                    (TupleIndex::Int(_), other) => Err(SemanticError::TypeMismatch {
                        message: format!("cannot access a field of non-tuple type {other}"),
                        span: ta.span,
                    }
                    .into()),
                }
            }
            Expression::ArrayLiteral(a) => {
                if a.elements.is_empty() {
                    return Err(SemanticError::GenericSemantic {
                        message: "cannot infer the type of an empty array literal".into(),
                        span: a.span,
                    }
                    .into());
                }
                let first = self.infer_expr_type(&a.elements[0])?;
                for elem in &a.elements[1..] {
                    let t = self.infer_expr_type(elem)?;
                    if t != first {
                        return Err(SemanticError::TypeMismatch {
                            message: format!(
                                "array elements must share one type: {first} vs {t}"
                            ),
                            span: elem.span(),
                        }
                        .into());
                    }
                }
                Ok(Type::Array(ArrayType {
                    inner: Box::new(first),
                    size: a.elements.len() as u32,
                }))
            }
            Expression::TupleLiteral(t) => {
                let elements = t
                    .elements
                    .iter()
                    .map(|e| self.infer_expr_type(e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Type::Tuple(TupleType { elements }))
            }
            Expression::Block(block) => self.analyze_block_as_value(block),
        }
    }

    /// `&`/`&mut` of a plain identifier borrows the named variable and sets
    /// its (monotonic, never-cleared) borrow flag; `&`/`&mut` of anything
    /// else just wraps the operand's type, since only named bindings
    /// participate in the borrow model (§4.3/§7 `BorrowCheck`).
    fn infer_ref_expr(&mut self, ref_expr: &minilang_ast::RefExpr) -> Result<Type> {
        if let Expression::Identifier { name, span } = ref_expr.operand.as_ref() {
            let sym = self.scopes.lookup(name).cloned().ok_or_else(|| {
                SemanticError::UndeclaredVariable { name: name.to_string(), span: *span }
            })?;
            if !sym.initialized {
                return Err(SemanticError::UninitializedVariable {
                    name: name.to_string(),
                    span: *span,
                }
                .into());
            }
            if ref_expr.mutable {
                if !sym.mutable {
                    return Err(SemanticError::BorrowCheck {
                        message: format!("cannot borrow immutable variable '{name}' as mutable"),
                        span: ref_expr.span,
                    }
                    .into());
                }
                if sym.borrowed_mut || sym.borrowed_immut {
                    return Err(SemanticError::BorrowCheck {
                        message: format!("variable '{name}' is already borrowed"),
                        span: ref_expr.span,
                    }
                    .into());
                }
            } else if sym.borrowed_mut {
                return Err(SemanticError::BorrowCheck {
                    message: format!("variable '{name}' is already mutably borrowed"),
                    span: ref_expr.span,
                }
                .into());
            }

            let entry = self.scopes.lookup_mut(name).expect("looked up above");
            if ref_expr.mutable {
                entry.borrowed_mut = true;
            } else {
                entry.borrowed_immut = true;
            }
            Ok(Type::Reference(ReferenceType { mutable: ref_expr.mutable, inner: Box::new(sym.type_) }))
        } else {
            let inner = self.infer_expr_type(&ref_expr.operand)?;
            Ok(Type::Reference(ReferenceType { mutable: ref_expr.mutable, inner: Box::new(inner) }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_source(src: &str) -> Result<()> {
        let program = minilang_parser::parse_source(src).expect("source must parse");
        analyze(&program)
    }

    #[test]
    fn simple_function_type_checks() {
        analyze_source("fn add(a: i32, b: i32) -> i32 { a + b }").unwrap();
    }

    #[test]
    fn undeclared_variable_is_rejected() {
        let err = analyze_source("fn f() -> i32 { x }").unwrap_err();
        assert!(matches!(err, minilang_errors::Error::Semantic(SemanticError::UndeclaredVariable { .. })));
    }

    #[test]
    fn immutable_assignment_is_rejected() {
        let err =
            analyze_source("fn f() { let a: i32 = 1; a = 2; }").unwrap_err();
        assert!(matches!(
            err,
            minilang_errors::Error::Semantic(SemanticError::ImmutableAssignment { .. })
        ));
    }

    #[test]
    fn index_assignment_into_an_immutable_array_is_rejected() {
        let err =
            analyze_source("fn f() { let a: [i32; 3] = [1, 2, 3]; a[0] = 9; }").unwrap_err();
        assert!(matches!(
            err,
            minilang_errors::Error::Semantic(SemanticError::ImmutableAssignment { .. })
        ));
    }

    #[test]
    fn tuple_field_assignment_into_an_immutable_tuple_is_rejected() {
        let err =
            analyze_source("fn f() { let t: (i32, i32) = (1, 2,); t.0 = 9; }").unwrap_err();
        assert!(matches!(
            err,
            minilang_errors::Error::Semantic(SemanticError::ImmutableAssignment { .. })
        ));
    }

    #[test]
    fn index_assignment_into_a_mutable_array_is_accepted() {
        analyze_source("fn f() { let mut a: [i32; 3] = [1, 2, 3]; a[0] = 9; }").unwrap();
    }

    #[test]
    fn shadow_redeclaration_without_type_or_initializer_is_permitted() {
        analyze_source("fn f() { let a: i32 = 1; let a; }").unwrap();
    }

    #[test]
    fn redeclaration_without_type_or_initializer_needs_a_prior_binding() {
        let err = analyze_source("fn f() { let a; }").unwrap_err();
        assert!(matches!(
            err,
            minilang_errors::Error::Semantic(SemanticError::GenericSemantic { .. })
        ));
    }

    #[test]
    fn reading_an_unknown_typed_shadow_is_rejected() {
        let err = analyze_source("fn f() -> i32 { let a: i32 = 1; let a; a }").unwrap_err();
        assert!(matches!(err, minilang_errors::Error::Semantic(SemanticError::TypeMismatch { .. })));
    }

    #[test]
    fn double_mutable_borrow_is_a_borrow_check_error() {
        let err = analyze_source(
            "fn f() { let mut a: i32 = 1; let b = &a; let mut c = &mut a; }",
        )
        .unwrap_err();
        assert!(matches!(err, minilang_errors::Error::Semantic(SemanticError::BorrowCheck { .. })));
    }

    #[test]
    fn tuple_field_by_name_is_rejected() {
        let err = analyze_source("fn f() { let t: (i32,) = (1,); let x = t.foo; }").unwrap_err();
        assert!(matches!(err, minilang_errors::Error::Semantic(SemanticError::GenericSemantic { .. })));
    }

    #[test]
    fn break_outside_loop_is_invalid_control_flow() {
        let err = analyze_source("fn f() { break; }").unwrap_err();
        assert!(matches!(
            err,
            minilang_errors::Error::Semantic(SemanticError::InvalidControlFlow { .. })
        ));
    }

    #[test]
    fn loop_expression_value_comes_from_its_breaks() {
        analyze_source("fn f() -> i32 { loop { break 5; } }").unwrap();
    }

    #[test]
    fn disagreeing_break_types_are_rejected() {
        let err = analyze_source(
            "fn f() { let _a = loop { if 1 { break 5; } else { break (1, 2); } }; }",
        )
        .unwrap_err();
        assert!(matches!(err, minilang_errors::Error::Semantic(SemanticError::TypeMismatch { .. })));
    }

    #[test]
    fn void_function_cannot_return_a_value() {
        let err = analyze_source("fn f() { return 1; }").unwrap_err();
        assert!(matches!(err, minilang_errors::Error::Semantic(SemanticError::ReturnType { .. })));
    }

    #[test]
    fn implicit_tail_return_is_checked_like_an_explicit_one() {
        let err = analyze_source("fn f() { 1 }").unwrap_err();
        assert!(matches!(err, minilang_errors::Error::Semantic(SemanticError::ReturnType { .. })));
    }
}
