//! Node tags.
//!
//! Every node carries a [`NodeTag`]. The upper three bits of the tag's byte value
//! place the node into overlapping categories:
//!
//! ```text
//! bit 7  DEF   definitions  (function, macro, struct, union)
//! bit 6  TYPE  type nodes   (struct, union, builtin, arrow, unknown, error)
//! bit 5  EXPR  expressions  (calls, placeholders, values, and the type-expressions)
//! ```
//!
//! The low bits distinguish variants inside a category.

use std::fmt;

pub const DEF: u8 = 1 << 7;
pub const TYPE: u8 = 1 << 6;
pub const EXPR: u8 = 1 << 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeTag {
    Borrow = 1,

    FunctionDef = 1 | DEF,
    MacroDef = 2 | DEF,
    StructDef = TYPE | DEF,
    UnionDef = 1 | TYPE | DEF,

    BuiltinType = 2 | TYPE | EXPR,
    FunctionType = 3 | TYPE | EXPR,
    UnknownType = 4 | TYPE | EXPR,
    ErrorType = 5 | TYPE | EXPR,

    UnaryCall = 1 | EXPR,
    BinaryCall = 2 | EXPR,
    FunctionCall = 3 | EXPR,
    Match = 4 | EXPR,
    Placeholder = 6 | EXPR,
    Value = 8 | EXPR,
}

impl NodeTag {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn is_def(self) -> bool {
        self.bits() & DEF != 0
    }

    pub fn is_type(self) -> bool {
        self.bits() & TYPE != 0
    }

    pub fn is_expr(self) -> bool {
        self.bits() & EXPR != 0
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeTag::Borrow => "borrow",
            NodeTag::FunctionDef => "function_def",
            NodeTag::MacroDef => "macro_def",
            NodeTag::StructDef => "struct_def",
            NodeTag::UnionDef => "union_def",
            NodeTag::BuiltinType => "builtin_type",
            NodeTag::FunctionType => "function_type",
            NodeTag::UnknownType => "unknown_type",
            NodeTag::ErrorType => "error_type",
            NodeTag::UnaryCall => "unary_call",
            NodeTag::BinaryCall => "binary_call",
            NodeTag::FunctionCall => "function_call",
            NodeTag::Match => "match",
            NodeTag::Placeholder => "placeholder",
            NodeTag::Value => "value",
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(NodeTag::FunctionDef.is_def());
        assert!(!NodeTag::FunctionDef.is_type());

        assert!(NodeTag::StructDef.is_def());
        assert!(NodeTag::StructDef.is_type());
        assert!(!NodeTag::StructDef.is_expr());

        assert!(NodeTag::FunctionType.is_type());
        assert!(NodeTag::FunctionType.is_expr());

        assert!(NodeTag::Value.is_expr());
        assert!(!NodeTag::Value.is_type());

        let borrow = NodeTag::Borrow;
        assert!(!borrow.is_def() && !borrow.is_type() && !borrow.is_expr());
    }

    #[test]
    fn test_bit_values() {
        assert_eq!(NodeTag::FunctionDef.bits(), 0x81);
        assert_eq!(NodeTag::UnionDef.bits(), 0xC1);
        assert_eq!(NodeTag::Value.bits(), 0x28);
    }
}
