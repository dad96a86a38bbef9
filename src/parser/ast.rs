// AST definitions for submitted sort functions

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Types supported by the sandbox language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Void,
    /// `int a[N]` (sized) or `int a[]` (parameter or initializer-sized)
    IntArray(Option<usize>),
}

impl Type {
    pub fn is_array(&self) -> bool {
        matches!(self, Type::IntArray(_))
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Void => write!(f, "void"),
            Type::IntArray(Some(n)) => write!(f, "int[{}]", n),
            Type::IntArray(None) => write!(f, "int[]"),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitShl,
    BitShr,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitShl => "<<",
            BinOp::BitShr => ">>",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Not,     // !x
    BitNot,  // ~x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub param_type: Type,
    pub is_const: bool,
}

/// AST nodes representing statements and expressions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    FunctionDef {
        name: String,
        params: Vec<Param>,
        body: Vec<AstNode>,
        return_type: Type,
        location: SourceLocation,
    },

    // Statements
    VarDecl {
        name: String,
        var_type: Type,
        is_const: bool,
        init: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        then_branch: Vec<AstNode>,
        else_branch: Option<Vec<AstNode>>,
        location: SourceLocation,
    },
    While {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    DoWhile {
        body: Vec<AstNode>,
        condition: Box<AstNode>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<AstNode>>,
        condition: Option<Box<AstNode>>,
        increment: Option<Box<AstNode>>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    Block {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    ExpressionStatement {
        expr: Box<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    IntLiteral(i32, SourceLocation),
    StringLiteral(String, SourceLocation),
    /// `{1, 2, 3}`, only valid as an array initializer
    InitializerList(Vec<AstNode>, SourceLocation),
    Variable(String, SourceLocation),
    Assignment {
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
        location: SourceLocation,
    },
    CompoundAssignment {
        lhs: Box<AstNode>,
        op: BinOp,
        rhs: Box<AstNode>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    TernaryOp {
        condition: Box<AstNode>,
        true_expr: Box<AstNode>,
        false_expr: Box<AstNode>,
        location: SourceLocation,
    },
    FunctionCall {
        name: String,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
    ArrayAccess {
        array: Box<AstNode>,
        index: Box<AstNode>,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            AstNode::FunctionDef { location, .. }
            | AstNode::VarDecl { location, .. }
            | AstNode::Return { location, .. }
            | AstNode::If { location, .. }
            | AstNode::While { location, .. }
            | AstNode::DoWhile { location, .. }
            | AstNode::For { location, .. }
            | AstNode::Block { location, .. }
            | AstNode::Break { location }
            | AstNode::Continue { location }
            | AstNode::ExpressionStatement { location, .. }
            | AstNode::Assignment { location, .. }
            | AstNode::CompoundAssignment { location, .. }
            | AstNode::BinaryOp { location, .. }
            | AstNode::UnaryOp { location, .. }
            | AstNode::TernaryOp { location, .. }
            | AstNode::FunctionCall { location, .. }
            | AstNode::ArrayAccess { location, .. } => *location,
            AstNode::IntLiteral(_, loc)
            | AstNode::StringLiteral(_, loc)
            | AstNode::InitializerList(_, loc)
            | AstNode::Variable(_, loc) => *loc,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// Function definitions in source order
    pub nodes: Vec<AstNode>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Names of the functions defined by the program
    pub fn function_names(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                AstNode::FunctionDef { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}
