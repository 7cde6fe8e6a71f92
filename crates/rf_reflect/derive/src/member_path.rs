//! `member_path!`: member paths from member-access closures.

use syn::{Expr, ExprClosure, ExprLit, Ident, Lit, Member, Pat, Stmt, UnOp, spanned::Spanned};

/// Returns the path the body of `closure` describes.
pub(crate) fn extract(closure: &ExprClosure) -> syn::Result<String> {
    let root = root_ident(closure)?;
    let mut segments = Vec::new();
    walk(unwrap(&closure.body), root, &mut segments, true)?;
    if segments.is_empty() {
        return Err(syn::Error::new(
            closure.body.span(),
            "expected at least one member access",
        ));
    }
    Ok(segments.join("."))
}

fn root_ident(closure: &ExprClosure) -> syn::Result<&Ident> {
    let mut inputs = closure.inputs.iter();
    let (Some(input), None) = (inputs.next(), inputs.next()) else {
        return Err(syn::Error::new(
            closure.inputs.span(),
            "expected a closure with exactly one parameter",
        ));
    };
    let pat = match input {
        Pat::Type(typed) => &*typed.pat,
        pat => pat,
    };
    match pat {
        Pat::Ident(ident) => Ok(&ident.ident),
        pat => Err(syn::Error::new(pat.span(), "expected a parameter name")),
    }
}

/// Strips parentheses, references and single-expression blocks.
fn unwrap(mut expr: &Expr) -> &Expr {
    loop {
        expr = match expr {
            Expr::Paren(inner) => &inner.expr,
            Expr::Reference(inner) => &inner.expr,
            Expr::Block(block) => match block.block.stmts.as_slice() {
                [Stmt::Expr(inner, None)] => inner,
                _ => return expr,
            },
            _ => return expr,
        };
    }
}

fn walk(expr: &Expr, root: &Ident, segments: &mut Vec<String>, last: bool) -> syn::Result<()> {
    match expr {
        Expr::Path(path) if path.path.is_ident(root) => Ok(()),
        Expr::Paren(inner) => walk(&inner.expr, root, segments, last),
        Expr::Field(field) => {
            walk(&field.base, root, segments, false)?;
            match &field.member {
                Member::Named(ident) => {
                    segments.push(ident.to_string());
                    Ok(())
                }
                Member::Unnamed(index) => Err(syn::Error::new(
                    index.span(),
                    "tuple fields cannot be named in a member path",
                )),
            }
        }
        Expr::Index(index) => {
            walk(&index.expr, root, segments, false)?;
            let key = index_key(&index.index)?;
            match segments.last_mut() {
                // `a[1][2]` indexes the element itself: `a[1].[2]`.
                Some(segment) if !segment.ends_with(']') => {
                    segment.push('[');
                    segment.push_str(&key);
                    segment.push(']');
                }
                _ => segments.push(format!("[{key}]")),
            }
            Ok(())
        }
        Expr::MethodCall(call) if last => {
            walk(&call.receiver, root, segments, false)?;
            segments.push(call.method.to_string());
            Ok(())
        }
        Expr::MethodCall(call) => Err(syn::Error::new(
            call.method.span(),
            "calls are only allowed at the end of a member path",
        )),
        expr => Err(syn::Error::new(
            expr.span(),
            format_args!("expected a member access on `{root}`"),
        )),
    }
}

fn index_key(expr: &Expr) -> syn::Result<String> {
    let key = match unwrap(expr) {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Int(int) => int.base10_digits().to_owned(),
            Lit::Str(text) => text.value(),
            Lit::Char(ch) => ch.value().to_string(),
            Lit::Bool(flag) => flag.value.to_string(),
            lit => return Err(syn::Error::new(lit.span(), "unsupported index key literal")),
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match unwrap(&unary.expr) {
            Expr::Lit(ExprLit {
                lit: Lit::Int(int), ..
            }) => format!("-{}", int.base10_digits()),
            expr => return Err(syn::Error::new(expr.span(), "index keys must be literals")),
        },
        expr => return Err(syn::Error::new(expr.span(), "index keys must be literals")),
    };
    if key.is_empty() || key.contains(['[', ']', ',']) {
        return Err(syn::Error::new(
            expr.span(),
            "index keys cannot be empty or contain `[`, `]` or `,`",
        ));
    }
    Ok(key)
}
