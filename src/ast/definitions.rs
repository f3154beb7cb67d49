use crate::ast::NodeRef;

/// Function or macro definition.
///
/// Both share this shape; a macro's body is meant to run while the tree is
/// being built instead of at run time.
///
/// # Example
/// ```text
/// def sqr(x: f64) -> f64:
///     x * x
/// ```
#[derive(Debug)]
pub struct Function {
    pub name: String,
    /// Parameter names in declaration order.
    pub params: Vec<String>,
    /// `FunctionType` node built from the declared parameter and return types.
    pub signature: Option<NodeRef>,
    pub body: NodeRef,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Struct or union definition.
///
/// # Example
/// ```text
/// struct Pair(T: Type):
///     a: T
///     b: T
/// ```
#[derive(Debug)]
pub struct Record {
    pub name: String,
    pub meta_types: Vec<(String, NodeRef)>,
    pub attributes: Vec<(String, NodeRef)>,
}

impl Record {
    pub fn attribute(&self, name: &str) -> Option<&NodeRef> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, ty)| ty)
    }
}
