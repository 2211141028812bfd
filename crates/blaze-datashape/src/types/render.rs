//! Rendering of [`Type`] back to datashape source.
//!
//! Output is canonical: `, ` between components, `; ` between record fields,
//! aliases spelled out, strings single-quoted. Multi-component shapes used as
//! constructor arguments are wrapped in parentheses.

use std::fmt::{self, Display, Formatter, Write};

use super::Type;

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Fixed(n) => write!(f, "{n}"),
            Type::TypeVar(name) => f.write_str(name),
            Type::Primitive(kind) => write!(f, "{kind}"),
            Type::DataShape(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
            Type::Record(fields) => {
                f.write_char('{')?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                f.write_char('}')
            }
            Type::Option(inner) => write!(f, "Option({})", Arg(inner)),
            Type::Union(members) => {
                f.write_str("Union(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", Arg(member))?;
                }
                f.write_char(')')
            }
            Type::Either(left, right) => write!(f, "Either({}, {})", Arg(left), Arg(right)),
            Type::Range(low, high) => write!(f, "Range({low}, {high})"),
            Type::Varchar(len) => write!(f, "Varchar({len})"),
            Type::String { length, encoding } => match (length, encoding) {
                (None, None) => f.write_str("string"),
                (Some(len), None) => write!(f, "string({len})"),
                (None, Some(enc)) => write!(f, "string({})", Quoted(enc)),
                (Some(len), Some(enc)) => write!(f, "string({len}, {})", Quoted(enc)),
            },
        }
    }
}

/// Constructor argument: multi-component shapes need a group.
struct Arg<'a>(&'a Type);

impl Display for Arg<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Type::DataShape(_) => write!(f, "({})", self.0),
            other => write!(f, "{other}"),
        }
    }
}

/// Single-quoted string literal, escaped so the lexer reads back the same text.
struct Quoted<'a>(&'a str);

impl Display for Quoted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('\'')?;
        for c in self.0.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                '\'' => f.write_str("\\'")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                '\0' => f.write_str("\\0")?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('\'')
    }
}
