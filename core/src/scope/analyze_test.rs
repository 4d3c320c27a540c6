#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::ast::{CLOSURE_PARAM, Expr, Func, Stmt, VarKind};
    use crate::error::EvalError;
    use crate::op::BinOp;
    use crate::scope::{Resolved, ScopeAnalyzer};

    fn ident(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    // fn inc(x) { var y = x + 1; return y; }
    fn inc_func() -> Arc<Func> {
        Func::new(
            Some("inc".to_string()),
            vec!["x".to_string()],
            Stmt::Block(vec![
                Stmt::Var {
                    name: "y".to_string(),
                    init: Some(Expr::Binary {
                        op: BinOp::Add,
                        lhs: Box::new(ident("x")),
                        rhs: Box::new(Expr::Num(1.0)),
                    }),
                },
                Stmt::Return(Some(ident("y"))),
            ]),
        )
    }

    #[test]
    fn lookups_fail_loudly_before_analysis() {
        let func = inc_func();
        assert!(!func.analyzed());
        let err = func.var("x").unwrap_err();
        match err.downcast_ref::<EvalError>() {
            Some(EvalError::Unanalyzed { func, name }) => {
                assert_eq!(func, "inc");
                assert_eq!(name, "x");
            }
            other => panic!("expected Unanalyzed, got {other:?}"),
        }
        assert!(func.variables().is_err());
    }

    #[test]
    fn table_holds_closure_slot_params_and_locals() {
        let func = inc_func();
        ScopeAnalyzer::new().analyze(&func);

        let vars = func.variables().unwrap();
        assert_eq!(vars.len(), 3);
        assert_eq!(vars[0].name, CLOSURE_PARAM);
        assert_eq!(vars[0].kind, VarKind::Closure);
        assert_eq!(vars[0].index, 0);
        assert_eq!(vars[1].name, "x");
        assert_eq!(vars[1].kind, VarKind::Param);
        assert_eq!(vars[1].index, 1);
        assert_eq!(vars[2].name, "y");
        assert_eq!(vars[2].kind, VarKind::Local);
        assert_eq!(vars[2].index, 2);

        assert_eq!(func.var("x").unwrap().index, 1);
        assert!(func.var("z").is_err());
    }

    #[test]
    fn locals_are_registered_before_the_body_is_walked() {
        // var a = b; var b = 1;  -- the use of b resolves to the hoisted slot
        let func = Func::new(
            None,
            vec![],
            Stmt::Block(vec![
                Stmt::Var {
                    name: "a".to_string(),
                    init: Some(ident("b")),
                },
                Stmt::Var {
                    name: "b".to_string(),
                    init: Some(Expr::Num(1.0)),
                },
            ]),
        );
        ScopeAnalyzer::new().analyze(&func);
        let uses = func.uses();
        let b_use = uses.iter().find(|u| u.name == "b").unwrap();
        assert!(matches!(b_use.target, Resolved::Local(_)));
    }

    #[test]
    fn analysis_is_idempotent() {
        let func = inc_func();
        let mut analyzer = ScopeAnalyzer::new();
        analyzer.analyze(&func);
        let first_vars = func.variables().unwrap();
        let first_uses = func.uses();

        analyzer.analyze(&func);
        assert_eq!(func.variables().unwrap(), first_vars);
        assert_eq!(func.uses(), first_uses);
    }

    #[test]
    fn nested_function_classifies_captures() {
        // fn outer(a) { var f = fn(b) { return a + b + g; }; }
        let inner = Func::new(
            None,
            vec!["b".to_string()],
            Stmt::Return(Some(Expr::Binary {
                op: BinOp::Add,
                lhs: Box::new(Expr::Binary {
                    op: BinOp::Add,
                    lhs: Box::new(ident("a")),
                    rhs: Box::new(ident("b")),
                }),
                rhs: Box::new(ident("g")),
            })),
        );
        let outer = Func::new(
            Some("outer".to_string()),
            vec!["a".to_string()],
            Stmt::Var {
                name: "f".to_string(),
                init: Some(Expr::Func(inner.clone())),
            },
        );
        ScopeAnalyzer::new().analyze(&outer);

        assert!(inner.analyzed());
        let uses = inner.uses();
        let target_of = |name: &str| uses.iter().find(|u| u.name == name).unwrap().target;

        // Own parameter: local slot. Outer parameter: one frame out.
        // Unknown name: frame-chain ascent to the globals.
        assert!(matches!(target_of("b"), Resolved::Local(_)));
        assert_eq!(
            target_of("a"),
            Resolved::Enclosing {
                depth: 1,
                index: outer.var("a").unwrap().index
            }
        );
        assert_eq!(target_of("g"), Resolved::Global);
    }

    #[test]
    fn named_function_resolves_its_name_in_the_enclosing_scope() {
        // fn outer() { var helper = ...; fn helper() {...} inside an expression }
        let named = Func::new(Some("helper".to_string()), vec![], Stmt::Block(vec![]));
        let outer = Func::new(
            Some("outer".to_string()),
            vec![],
            Stmt::Block(vec![
                Stmt::Var {
                    name: "helper".to_string(),
                    init: None,
                },
                Stmt::Expr(Expr::Func(named.clone())),
            ]),
        );
        ScopeAnalyzer::new().analyze(&outer);

        // The name resolved against outer's table, before the nested frame
        let outer_uses = outer.uses();
        let helper_use = outer_uses.iter().find(|u| u.name == "helper").unwrap();
        assert!(matches!(helper_use.target, Resolved::Local(_)));
    }

    #[test]
    fn synthetic_closure_param_is_always_first() {
        let lambda = Func::new(None, vec!["p".to_string(), "q".to_string()], Stmt::Block(vec![]));
        ScopeAnalyzer::new().analyze(&lambda);
        let vars = lambda.variables().unwrap();
        assert_eq!(vars[0].name, CLOSURE_PARAM);
        assert_eq!(vars[0].index, 0);
        let declared: Vec<&str> = lambda.declared_params().collect();
        assert_eq!(declared, vec!["p", "q"]);
    }
}
