use minilang_ast::{
    Assignment, BlockElement, BreakStmt, ContinueStmt, ElseBranch, Expression, ForStmt,
    FunctionDecl, FunctionExprBlock, IfStmt, LoopStmt, Program, ReturnStmt, Statement, Type,
    TupleIndex, VarDecl, WhileStmt,
};
use crate::quad::{Quad, QuadArg};

/// The value a block yields when its last element is a statement rather than
/// a bare tail expression. MiniLang's unit type has no runtime
/// representation to lower, so this sentinel name stands in for it in the
/// rare case a discarded unit-typed block value is written into a quad's
/// operand position (an `IfExpr`/`LoopExpr` whose arms/breaks are all `()`).
const UNIT_VALUE: &str = "()";

/// Per-loop bookkeeping for `break`/`continue` (§4.4, §9 "the loop stack").
/// `result_temp` is only `Some` for a [`minilang_ast::LoopExpr`]: a
/// `while`/`for`/`loop`-statement has no observable value, so a `break`
/// inside one never needs a destination for its (ignored) expression.
#[derive(Clone)]
struct LoopContext {
    start_label: String,
    end_label: String,
    result_temp: Option<QuadArg>,
}

/// Single recursive pass over a validated [`Program`], producing the linear
/// quad list of §4.4. One instance lowers every function in the program, so
/// the temporary/label counters are shared process-wide within one
/// `generate()` call — "sharing counters across functions is intentional for
/// unique naming" (spec.md §9).
pub struct Generator {
    quads: Vec<Quad>,
    temp_counter: u32,
    label_counter: u32,
    loop_stack: Vec<LoopContext>,
    /// Whether a `return` quad has been emitted for the function currently
    /// being lowered. Reset at the start of every function — checking this
    /// against the whole program's accumulated quad list (as the reference
    /// implementation does) would make the second function's default-return
    /// insertion depend on whether an earlier function already returned.
    returned_in_current_function: bool,
}

/// Lowers every function declaration in `program` into one flat quad list
/// (§6.1's `generate`). Infallible: by the time a [`Program`] reaches this
/// stage it has already passed semantic analysis, and like the teacher's own
/// `leo-passes::code_generation` this pass never re-validates what it walks.
pub fn generate(program: &Program) -> Vec<Quad> {
    let mut generator = Generator::new();
    for decl in &program.declarations {
        generator.lower_function(decl);
    }
    generator.quads
}

impl Generator {
    fn new() -> Self {
        Self {
            quads: Vec::new(),
            temp_counter: 0,
            label_counter: 0,
            loop_stack: Vec::new(),
            returned_in_current_function: false,
        }
    }

    fn new_temp(&mut self) -> String {
        let temp = format!("t{}", self.temp_counter);
        self.temp_counter += 1;
        temp
    }

    fn new_label(&mut self) -> String {
        let label = format!("L{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    fn emit(&mut self, op: impl Into<String>, arg1: Option<QuadArg>, arg2: Option<QuadArg>, result: Option<QuadArg>) {
        self.quads.push(Quad::new(op, arg1, arg2, result));
    }

    fn emit_label(&mut self, label: &str) {
        self.emit(format!("{label}:"), None, None, None);
    }

    fn emit_goto(&mut self, label: &str) {
        self.emit("goto", None, None, Some(QuadArg::Name(label.to_string())));
    }

    fn emit_ifz(&mut self, cond: QuadArg, label: &str) {
        self.emit("ifz", Some(cond), None, Some(QuadArg::Name(label.to_string())));
    }

    fn lower_function(&mut self, decl: &FunctionDecl) {
        self.returned_in_current_function = false;

        self.emit_label(&decl.name.to_string());
        for param in &decl.params {
            self.emit("param", Some(QuadArg::from(&param.name)), None, None);
        }
        self.lower_function_body(&decl.body);

        if !self.returned_in_current_function {
            self.emit("return", None, None, None);
        }
    }

    /// Lowers a function's own body: unlike an `if`-arm or `loop` body, a
    /// trailing bare expression here is an *implicit return* (mirroring the
    /// semantic analyzer checking it against the declared return type), so
    /// it is lowered into a `return` quad rather than left as a bare value.
    fn lower_function_body(&mut self, block: &FunctionExprBlock) {
        let last = block.elements.len().wrapping_sub(1);
        for (i, element) in block.elements.iter().enumerate() {
            match element {
                BlockElement::Stmt(stmt) => self.lower_statement(stmt),
                BlockElement::Expr(expr) => {
                    let value = self.lower_expr(expr);
                    if i == last {
                        self.emit("return", Some(value), None, None);
                        self.returned_in_current_function = true;
                    }
                }
            }
        }
    }

    /// Lowers a value-bearing block used anywhere *other* than as a function
    /// body: an `if`-expression arm or a `loop` body. Every element but a
    /// trailing bare expression is lowered for effect only; the trailing
    /// bare expression's value (or the unit sentinel, if there is none) is
    /// returned for the caller to assign into its own result temporary.
    fn lower_function_expr_block(&mut self, block: &FunctionExprBlock) -> QuadArg {
        let last = block.elements.len().wrapping_sub(1);
        let mut value = QuadArg::Name(UNIT_VALUE.to_string());
        for (i, element) in block.elements.iter().enumerate() {
            match element {
                BlockElement::Stmt(stmt) => self.lower_statement(stmt),
                BlockElement::Expr(expr) => {
                    let v = self.lower_expr(expr);
                    if i == last {
                        value = v;
                    }
                }
            }
        }
        value
    }

    fn lower_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VarDecl(v) => self.lower_var_decl(v),
            Statement::Assignment(a) => self.lower_assignment(a),
            Statement::ExprStmt(e) => {
                self.lower_expr(&e.expr);
            }
            Statement::If(s) => self.lower_if_stmt(s),
            Statement::While(w) => self.lower_while(w),
            Statement::For(f) => self.lower_for(f),
            Statement::Loop(l) => self.lower_loop_stmt(l),
            Statement::Return(r) => self.lower_return(r),
            Statement::Break(b) => self.lower_break(b),
            Statement::Continue(c) => self.lower_continue(c),
            Statement::Empty(_) => {}
            Statement::Block(b) => {
                for stmt in &b.statements {
                    self.lower_statement(stmt);
                }
            }
        }
    }

    fn lower_var_decl(&mut self, v: &VarDecl) {
        let mutability = QuadArg::Name(if v.mutable { "mut" } else { "const" }.to_string());
        let type_arg = v.var_type.as_ref().map(|t| QuadArg::Name(t.to_string()));
        self.emit("declare", Some(QuadArg::from(&v.name)), Some(mutability), type_arg);
        if let Some(init) = &v.init {
            let value = self.lower_expr(init);
            self.emit("=", Some(value), None, Some(QuadArg::from(&v.name)));
        }
    }

    fn lower_assignment(&mut self, a: &Assignment) {
        match &a.target {
            Expression::Identifier { name, .. } => {
                let value = self.lower_expr(&a.value);
                self.emit("=", Some(value), None, Some(QuadArg::from(name)));
            }
            Expression::Index(idx) => {
                let array = self.lower_expr(&idx.target);
                let index = self.lower_expr(&idx.index);
                let value = self.lower_expr(&a.value);
                self.emit("[]=", Some(array), Some(index), Some(value));
            }
            Expression::TupleAccess(ta) => {
                let tuple = self.lower_expr(&ta.target);
                let index = Self::tuple_index_arg(&ta.index);
                let value = self.lower_expr(&a.value);
                self.emit("tuple[]=", Some(tuple), Some(index), Some(value));
            }
            Expression::Deref(d) => {
                let ptr = self.lower_expr(&d.operand);
                let value = self.lower_expr(&a.value);
                self.emit("*=", Some(ptr), None, Some(value));
            }
            _ => unreachable!("semantic analysis only accepts identifier/index/tuple/deref assignment targets"),
        }
    }

    fn tuple_index_arg(index: &TupleIndex) -> QuadArg {
        match index {
            TupleIndex::Int(i) => QuadArg::Int(*i as i32),
            TupleIndex::Name(name) => QuadArg::from(name),
        }
    }

    fn lower_if_stmt(&mut self, s: &IfStmt) {
        let cond = self.lower_expr(&s.condition);
        let else_label = self.new_label();
        let end_label = self.new_label();

        self.emit_ifz(cond, &else_label);
        for stmt in &s.then.statements {
            self.lower_statement(stmt);
        }
        self.emit_goto(&end_label);
        self.emit_label(&else_label);
        if let Some(branch) = &s.otherwise {
            match branch.as_ref() {
                ElseBranch::Block(b) => {
                    for stmt in &b.statements {
                        self.lower_statement(stmt);
                    }
                }
                ElseBranch::If(nested) => self.lower_if_stmt(nested),
            }
        }
        self.emit_label(&end_label);
    }

    fn lower_while(&mut self, w: &WhileStmt) {
        let start_label = self.new_label();
        let end_label = self.new_label();
        self.loop_stack.push(LoopContext {
            start_label: start_label.clone(),
            end_label: end_label.clone(),
            result_temp: None,
        });

        self.emit_label(&start_label);
        let cond = self.lower_expr(&w.condition);
        self.emit_ifz(cond, &end_label);
        for stmt in &w.body.statements {
            self.lower_statement(stmt);
        }
        self.emit_goto(&start_label);
        self.emit_label(&end_label);

        self.loop_stack.pop();
    }

    /// `for v in s..e { body }`: the end bound is evaluated once, before the
    /// loop starts, exactly as the reference generator computes it ahead of
    /// emitting any label — not every iteration.
    fn lower_for(&mut self, f: &ForStmt) {
        let start_value = self.lower_expr(&f.start);
        let end_value = self.lower_expr(&f.end);

        let start_label = self.new_label();
        let end_label = self.new_label();
        self.loop_stack.push(LoopContext {
            start_label: start_label.clone(),
            end_label: end_label.clone(),
            result_temp: None,
        });

        let mutability = QuadArg::Name(if f.mutable { "mut" } else { "const" }.to_string());
        let var_type = f.var_type.clone().unwrap_or(Type::I32);
        self.emit(
            "declare",
            Some(QuadArg::from(&f.var)),
            Some(mutability),
            Some(QuadArg::Name(var_type.to_string())),
        );
        self.emit("=", Some(start_value), None, Some(QuadArg::from(&f.var)));

        self.emit_label(&start_label);
        let cond_temp = self.new_temp();
        self.emit("<", Some(QuadArg::from(&f.var)), Some(end_value), Some(QuadArg::Name(cond_temp.clone())));
        self.emit_ifz(QuadArg::Name(cond_temp), &end_label);
        for stmt in &f.body.statements {
            self.lower_statement(stmt);
        }
        let inc_temp = self.new_temp();
        self.emit("+", Some(QuadArg::from(&f.var)), Some(QuadArg::Int(1)), Some(QuadArg::Name(inc_temp.clone())));
        self.emit("=", Some(QuadArg::Name(inc_temp)), None, Some(QuadArg::from(&f.var)));
        self.emit_goto(&start_label);
        self.emit_label(&end_label);

        self.loop_stack.pop();
    }

    fn lower_loop_stmt(&mut self, l: &LoopStmt) {
        let start_label = self.new_label();
        let end_label = self.new_label();
        self.loop_stack.push(LoopContext {
            start_label: start_label.clone(),
            end_label: end_label.clone(),
            result_temp: None,
        });

        self.emit_label(&start_label);
        for stmt in &l.body.statements {
            self.lower_statement(stmt);
        }
        self.emit_goto(&start_label);
        self.emit_label(&end_label);

        self.loop_stack.pop();
    }

    fn lower_return(&mut self, r: &ReturnStmt) {
        let value = r.expression.as_ref().map(|e| self.lower_expr(e));
        self.emit("return", value, None, None);
        self.returned_in_current_function = true;
    }

    /// Jumps to the innermost loop's end label. If that loop is a
    /// [`minilang_ast::LoopExpr`] (it has a `result_temp`), the break's
    /// expression is first copied into it — otherwise the loop has no
    /// observable value and the expression, if any, is lowered for effect
    /// only and discarded.
    fn lower_break(&mut self, b: &BreakStmt) {
        let ctx = self.loop_stack.last().cloned().expect("semantic analysis rejects break outside a loop");
        match &ctx.result_temp {
            Some(result_temp) => {
                let value = match &b.expression {
                    Some(e) => self.lower_expr(e),
                    None => QuadArg::Name(UNIT_VALUE.to_string()),
                };
                self.emit("=", Some(value), None, Some(result_temp.clone()));
            }
            None => {
                if let Some(e) = &b.expression {
                    self.lower_expr(e);
                }
            }
        }
        self.emit_goto(&ctx.end_label);
    }

    fn lower_continue(&mut self, c: &ContinueStmt) {
        let _ = c;
        let start_label =
            self.loop_stack.last().expect("semantic analysis rejects continue outside a loop").start_label.clone();
        self.emit_goto(&start_label);
    }

    fn lower_expr(&mut self, expr: &Expression) -> QuadArg {
        match expr {
            Expression::Literal { value, .. } => QuadArg::Int(*value),
            Expression::Identifier { name, .. } => QuadArg::from(name),
            Expression::Binary(b) => {
                let left = self.lower_expr(&b.left);
                let right = self.lower_expr(&b.right);
                let temp = self.new_temp();
                self.emit(b.operator.to_string(), Some(left), Some(right), Some(QuadArg::Name(temp.clone())));
                QuadArg::Name(temp)
            }
            Expression::Unary(u) => {
                let operand = self.lower_expr(&u.argument);
                let temp = self.new_temp();
                self.emit(u.operator.to_string(), Some(operand), None, Some(QuadArg::Name(temp.clone())));
                QuadArg::Name(temp)
            }
            Expression::Call(c) => {
                for arg in &c.arguments {
                    let value = self.lower_expr(arg);
                    self.emit("param", Some(value), None, None);
                }
                let temp = self.new_temp();
                self.emit(
                    "call",
                    Some(QuadArg::from(&c.callee)),
                    Some(QuadArg::Int(c.arguments.len() as i32)),
                    Some(QuadArg::Name(temp.clone())),
                );
                QuadArg::Name(temp)
            }
            Expression::If(if_expr) => {
                let cond = self.lower_expr(&if_expr.condition);
                let else_label = self.new_label();
                let end_label = self.new_label();
                let result_temp = self.new_temp();

                self.emit_ifz(cond, &else_label);
                let then_value = self.lower_function_expr_block(&if_expr.then);
                self.emit("=", Some(then_value), None, Some(QuadArg::Name(result_temp.clone())));
                self.emit_goto(&end_label);

                self.emit_label(&else_label);
                let else_value = self.lower_function_expr_block(&if_expr.otherwise);
                self.emit("=", Some(else_value), None, Some(QuadArg::Name(result_temp.clone())));

                self.emit_label(&end_label);
                QuadArg::Name(result_temp)
            }
            Expression::Loop(loop_expr) => {
                let start_label = self.new_label();
                let end_label = self.new_label();
                let result_temp = self.new_temp();
                self.loop_stack.push(LoopContext {
                    start_label: start_label.clone(),
                    end_label: end_label.clone(),
                    result_temp: Some(QuadArg::Name(result_temp.clone())),
                });

                self.emit_label(&start_label);
                self.lower_function_expr_block(&loop_expr.body);
                self.emit_goto(&start_label);
                self.emit_label(&end_label);

                self.loop_stack.pop();
                QuadArg::Name(result_temp)
            }
            Expression::Ref(ref_expr) => {
                let operand = self.lower_expr(&ref_expr.operand);
                let mutability = QuadArg::Name(if ref_expr.mutable { "mut" } else { "const" }.to_string());
                let temp = self.new_temp();
                self.emit("&", Some(operand), Some(mutability), Some(QuadArg::Name(temp.clone())));
                QuadArg::Name(temp)
            }
            Expression::Deref(d) => {
                let operand = self.lower_expr(&d.operand);
                let temp = self.new_temp();
                self.emit("*", Some(operand), None, Some(QuadArg::Name(temp.clone())));
                QuadArg::Name(temp)
            }
            Expression::Index(idx) => {
                let target = self.lower_expr(&idx.target);
                let index = self.lower_expr(&idx.index);
                let temp = self.new_temp();
                self.emit("[]", Some(target), Some(index), Some(QuadArg::Name(temp.clone())));
                QuadArg::Name(temp)
            }
            Expression::TupleAccess(ta) => {
                let target = self.lower_expr(&ta.target);
                let index = Self::tuple_index_arg(&ta.index);
                let temp = self.new_temp();
                self.emit("tuple[]", Some(target), Some(index), Some(QuadArg::Name(temp.clone())));
                QuadArg::Name(temp)
            }
            Expression::ArrayLiteral(a) => {
                let temp = self.new_temp();
                self.emit("new_array", Some(QuadArg::Int(a.elements.len() as i32)), None, Some(QuadArg::Name(temp.clone())));
                for (i, element) in a.elements.iter().enumerate() {
                    let value = self.lower_expr(element);
                    self.emit("[]=", Some(QuadArg::Name(temp.clone())), Some(QuadArg::Int(i as i32)), Some(value));
                }
                QuadArg::Name(temp)
            }
            Expression::TupleLiteral(t) => {
                let temp = self.new_temp();
                self.emit("new_tuple", Some(QuadArg::Int(t.elements.len() as i32)), None, Some(QuadArg::Name(temp.clone())));
                for (i, element) in t.elements.iter().enumerate() {
                    let value = self.lower_expr(element);
                    self.emit("tuple[]=", Some(QuadArg::Name(temp.clone())), Some(QuadArg::Int(i as i32)), Some(value));
                }
                QuadArg::Name(temp)
            }
            Expression::Block(block) => self.lower_function_expr_block(block),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quads(src: &str) -> Vec<Quad> {
        let program = minilang_parser::parse_source(src).expect("source must parse");
        minilang_passes::analyze(&program).expect("source must pass analysis");
        generate(&program)
    }

    #[test]
    fn void_return_emits_a_bare_return_quad() {
        let qs = quads("fn f() { return; }");
        assert_eq!(qs[0].op, "f:");
        assert!(qs.iter().any(|q| q.op == "return" && q.arg1.is_none()));
    }

    #[test]
    fn every_function_gets_its_own_default_return() {
        let qs = quads("fn f() { let x: i32 = 1; } fn g() { let y: i32 = 2; }");
        let f_start = qs.iter().position(|q| q.op == "f:").unwrap();
        let g_start = qs.iter().position(|q| q.op == "g:").unwrap();
        assert!(qs[f_start..g_start].iter().any(|q| q.op == "return"));
        assert!(qs[g_start..].iter().any(|q| q.op == "return"));
    }

    #[test]
    fn implicit_tail_return_is_lowered_as_a_return_quad() {
        let qs = quads("fn add(a: i32, b: i32) -> i32 { a + b }");
        let last_real = qs.iter().rev().find(|q| !q.is_label()).unwrap();
        assert_eq!(last_real.op, "return");
        assert!(last_real.arg1.is_some());
    }

    #[test]
    fn while_loop_has_exactly_one_start_and_end_label() {
        let qs = quads("fn h(mut n: i32) { while n > 0 { n = n - 1; } }");
        assert_eq!(qs.iter().filter(|q| q.is_label() && q.op != "h:").count(), 2);
        assert!(qs.iter().any(|q| q.op == "ifz"));
    }

    #[test]
    fn array_literal_assignment_allocates_then_stores_each_element() {
        let qs = quads("fn k() { let mut a: [i32; 3]; a = [1, 2, 3]; }");
        let alloc = qs.iter().position(|q| q.op == "new_array").unwrap();
        let stores: Vec<_> = qs[alloc..].iter().take(4).map(|q| q.op.as_str()).collect();
        assert_eq!(stores, vec!["new_array", "[]=", "[]=", "[]="]);
    }

    #[test]
    fn loop_expression_threads_break_value_into_result_temp() {
        let qs = quads("fn m() { let mut a = loop { break 1; }; }");
        let break_assign_pos = qs
            .iter()
            .position(|q| q.op == "=" && q.arg1 == Some(QuadArg::Int(1)))
            .expect("break value must be copied into the loop's result temp");
        let goto_after = &qs[break_assign_pos + 1];
        assert_eq!(goto_after.op, "goto");
    }

    #[test]
    fn for_loop_end_bound_is_evaluated_once_before_the_loop() {
        let qs = quads("fn f() { for mut i in 0..3 { } }");
        let start_label = qs.iter().find(|q| q.is_label() && q.op.starts_with('L')).unwrap().op.clone();
        let start_idx = qs.iter().position(|q| q.op == start_label).unwrap();
        // the "<" comparison must be the first real instruction after the label
        assert_eq!(qs[start_idx + 1].op, "<");
    }
}
