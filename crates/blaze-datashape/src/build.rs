//! Lowering of the typed AST into structural [`Type`] values.
//!
//! Components fold here and only here: one component stands for itself, two or
//! more become a [`Type::DataShape`]. Constructor arguments are resolved one by
//! one and then checked positionally against the constructor's signature.

use crate::parser::{self, DEFAULT_RECURSION_LIMIT, Parse, ast};
use crate::types::{Constructor, PrimitiveKind, Type};
use crate::{Error, Result};

/// Configurable entry point for parsing and building datashapes.
///
/// ```
/// use blaze_datashape::DatashapeParser;
///
/// let parser = DatashapeParser::new().recursion_limit(Some(8));
/// assert!(parser.parse_type("Option(Option(int32))").is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatashapeParser {
    recursion_limit: Option<u32>,
}

impl Default for DatashapeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DatashapeParser {
    pub fn new() -> Self {
        Self {
            recursion_limit: Some(DEFAULT_RECURSION_LIMIT),
        }
    }

    /// Maximum nesting of records, applications and groups. `None` disables the check.
    pub fn recursion_limit(mut self, limit: Option<u32>) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn parse(&self, source: &str) -> Result<Parse> {
        parser::parse_with_limit(source, self.recursion_limit)
    }

    /// Exactly one statement. Several statements fail with `InvalidNode(Root)`.
    pub fn parse_type(&self, source: &str) -> Result<Type> {
        let parse = self.parse(source)?;
        let root = parse.root();
        let mut stmts = root.stmts();
        let (Some(stmt), None) = (stmts.next(), stmts.next()) else {
            return Err(invalid_node(root.as_cst()));
        };
        let ty = build_stmt(&stmt)?;
        tracing::debug!(%ty, "built datashape");
        Ok(ty)
    }

    pub fn parse_all(&self, source: &str) -> Result<Vec<Type>> {
        let parse = self.parse(source)?;
        let types = parse
            .root()
            .stmts()
            .map(|stmt| build_stmt(&stmt))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(statements = types.len(), "built datashape module");
        Ok(types)
    }
}

/// Builds the type of a single statement.
pub fn build_stmt(stmt: &ast::Stmt) -> Result<Type> {
    match stmt {
        ast::Stmt::Decl(decl) => build_decl(decl),
        ast::Stmt::Instance(instance) => build_rhs(instance.components(), instance.as_cst()),
    }
}

fn build_decl(decl: &ast::Decl) -> Result<Type> {
    let Some(head) = decl.head() else {
        return Err(invalid_node(decl.as_cst()));
    };
    let Some(name) = head.name() else {
        return Err(invalid_node(head.as_cst()));
    };

    let params: Vec<String> = head.params().map(|t| t.text().to_string()).collect();
    if !params.is_empty() {
        return Err(Error::ParametrizedTypeUnsupported {
            name: name.text().to_string(),
            params,
            span: head.as_cst().text_range(),
        });
    }

    build_rhs(decl.components(), decl.as_cst())
}

/// Builds every component and folds. An empty right-hand side is an invalid `owner`.
fn build_rhs(
    components: impl Iterator<Item = ast::Expr>,
    owner: &parser::SyntaxNode,
) -> Result<Type> {
    let parts = components
        .map(|expr| build_component(&expr))
        .collect::<Result<Vec<_>>>()?;
    if parts.is_empty() {
        return Err(invalid_node(owner));
    }
    Ok(Type::from_components(parts))
}

fn build_component(expr: &ast::Expr) -> Result<Type> {
    match expr {
        ast::Expr::Dim(dim) => dim
            .value()
            .map(Type::Fixed)
            .ok_or_else(|| invalid_node(dim.as_cst())),
        ast::Expr::Var(var) => build_var(var),
        ast::Expr::Prim(prim) => build_prim(prim),
        ast::Expr::Record(record) => build_record(record),
        ast::Expr::Appl(appl) => build_appl(appl),
        ast::Expr::Group(_) | ast::Expr::Str(_) => Err(invalid_node(expr.as_cst())),
    }
}

fn build_var(var: &ast::Var) -> Result<Type> {
    var.token()
        .map(|t| Type::TypeVar(t.text().to_string()))
        .ok_or_else(|| invalid_node(var.as_cst()))
}

fn build_prim(prim: &ast::Prim) -> Result<Type> {
    prim.token()
        .and_then(|t| PrimitiveKind::from_name(t.text()))
        .map(Type::Primitive)
        .ok_or_else(|| invalid_node(prim.as_cst()))
}

fn build_record(record: &ast::Record) -> Result<Type> {
    let mut fields = Vec::new();
    for field in record.fields() {
        let Some(name) = field.name() else {
            return Err(invalid_node(field.as_cst()));
        };
        let components: Vec<ast::Expr> = field.components().collect();
        let ty = match components.as_slice() {
            [ast::Expr::Group(group)] => build_rhs(group.components(), group.as_cst())?,
            _ => build_rhs(components.into_iter(), field.as_cst())?,
        };
        fields.push((name.text().to_string(), ty));
    }
    Ok(Type::Record(fields))
}

/// Resolved application argument.
#[derive(Debug)]
enum Arg {
    Type(Type),
    Int(u64),
    Str(String),
}

impl Arg {
    fn describe(&self) -> &'static str {
        match self {
            Arg::Type(_) => "a type",
            Arg::Int(_) => "an integer",
            Arg::Str(_) => "a string",
        }
    }
}

fn build_arg(expr: &ast::Expr) -> Result<Arg> {
    match expr {
        ast::Expr::Dim(dim) => dim
            .value()
            .map(Arg::Int)
            .ok_or_else(|| invalid_node(dim.as_cst())),
        ast::Expr::Str(s) => s
            .value()
            .map(Arg::Str)
            .ok_or_else(|| invalid_node(s.as_cst())),
        ast::Expr::Group(group) => build_rhs(group.components(), group.as_cst()).map(Arg::Type),
        ast::Expr::Var(var) => build_var(var).map(Arg::Type),
        ast::Expr::Prim(prim) => build_prim(prim).map(Arg::Type),
        ast::Expr::Record(record) => build_record(record).map(Arg::Type),
        ast::Expr::Appl(appl) => build_appl(appl).map(Arg::Type),
    }
}

fn build_appl(appl: &ast::Appl) -> Result<Type> {
    let Some(head) = appl.head() else {
        return Err(invalid_node(appl.as_cst()));
    };
    let Some(constructor) = Constructor::from_name(head.text()) else {
        return Err(Error::UnknownConstructor {
            name: head.text().to_string(),
            span: head.text_range(),
        });
    };

    let args = appl
        .args()
        .map(|expr| build_arg(&expr))
        .collect::<Result<Vec<_>>>()?;

    apply(constructor, args).map_err(|reason| Error::InvalidConstructorArguments {
        constructor,
        reason,
        span: appl.as_cst().text_range(),
    })
}

/// Checks arguments against the constructor's signature. `Err` carries the reason.
fn apply(constructor: Constructor, args: Vec<Arg>) -> std::result::Result<Type, String> {
    match constructor {
        Constructor::Option => {
            let [inner] = exact::<1>(args)?;
            Ok(Type::Option(Box::new(expect_type(inner)?)))
        }
        Constructor::Either => {
            let [left, right] = exact::<2>(args)?;
            Ok(Type::Either(
                Box::new(expect_type(left)?),
                Box::new(expect_type(right)?),
            ))
        }
        Constructor::Union => {
            if args.is_empty() {
                return Err("expected at least 1 argument".to_string());
            }
            let members = args
                .into_iter()
                .map(expect_type)
                .collect::<std::result::Result<_, _>>()?;
            Ok(Type::Union(members))
        }
        Constructor::Range => {
            let [low, high] = exact::<2>(args)?;
            let (low, high) = (expect_int(low)?, expect_int(high)?);
            if low > high {
                return Err(format!("lower bound {low} exceeds upper bound {high}"));
            }
            Ok(Type::Range(low, high))
        }
        Constructor::Varchar => {
            let [len] = exact::<1>(args)?;
            Ok(Type::Varchar(expect_int(len)?))
        }
        Constructor::String => match <[Arg; 1]>::try_from(args) {
            Ok([Arg::Int(len)]) => Ok(Type::String {
                length: Some(len),
                encoding: None,
            }),
            Ok([Arg::Str(enc)]) => Ok(Type::String {
                length: None,
                encoding: Some(enc),
            }),
            Ok([other]) => Err(format!(
                "expected an integer or a string, found {}",
                other.describe()
            )),
            Err(args) => {
                let [len, enc] = exact::<2>(args)?;
                Ok(Type::String {
                    length: Some(expect_int(len)?),
                    encoding: Some(expect_str(enc)?),
                })
            }
        },
        Constructor::Record => {
            let mut fields = Vec::new();
            for arg in args {
                match expect_type(arg)? {
                    Type::Record(more) => fields.extend(more),
                    other => return Err(format!("expected a record, found `{other}`")),
                }
            }
            Ok(Type::Record(fields))
        }
    }
}

fn exact<const N: usize>(args: Vec<Arg>) -> std::result::Result<[Arg; N], String> {
    let found = args.len();
    <[Arg; N]>::try_from(args).map_err(|_| {
        let plural = if N == 1 { "" } else { "s" };
        format!("expected {N} argument{plural}, found {found}")
    })
}

fn expect_type(arg: Arg) -> std::result::Result<Type, String> {
    match arg {
        Arg::Type(ty) => Ok(ty),
        other => Err(format!("expected a type, found {}", other.describe())),
    }
}

fn expect_int(arg: Arg) -> std::result::Result<u64, String> {
    match arg {
        Arg::Int(n) => Ok(n),
        other => Err(format!("expected an integer, found {}", other.describe())),
    }
}

fn expect_str(arg: Arg) -> std::result::Result<String, String> {
    match arg {
        Arg::Str(s) => Ok(s),
        other => Err(format!("expected a string, found {}", other.describe())),
    }
}

fn invalid_node(node: &parser::SyntaxNode) -> Error {
    Error::InvalidNode {
        kind: node.kind(),
        span: node.text_range(),
    }
}
