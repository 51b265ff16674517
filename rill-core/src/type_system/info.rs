use std::fmt;

/// A type variable, to be solved by unification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar(pub usize);

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The closed set of Rill base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeConstant {
    Integer,
    Boolean,
    StringSlice,
    Character,
}

impl fmt::Display for TypeConstant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            TypeConstant::Integer => "int",
            TypeConstant::Boolean => "bool",
            TypeConstant::StringSlice => "str",
            TypeConstant::Character => "char",
        };
        f.write_str(text)
    }
}

/// A monomorphic type term. These are pure values compared structurally;
/// unification over them never touches the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    Constant(TypeConstant),
    Var(TypeVar),
    Fn(Box<TypeInfo>, Box<TypeInfo>),
    Tuple(Vec<TypeInfo>),
}

impl TypeInfo {
    /// The unit type, i.e. the empty tuple.
    pub fn unit() -> TypeInfo {
        TypeInfo::Tuple(vec![])
    }

    pub fn integer() -> TypeInfo {
        TypeInfo::Constant(TypeConstant::Integer)
    }

    pub fn boolean() -> TypeInfo {
        TypeInfo::Constant(TypeConstant::Boolean)
    }

    pub fn string_slice() -> TypeInfo {
        TypeInfo::Constant(TypeConstant::StringSlice)
    }

    pub fn character() -> TypeInfo {
        TypeInfo::Constant(TypeConstant::Character)
    }

    /// Builds the right-nested binary form of an n-ary function type. A
    /// nullary function takes unit.
    pub fn function(params: Vec<TypeInfo>, ret: TypeInfo) -> TypeInfo {
        if params.is_empty() {
            return TypeInfo::Fn(Box::new(TypeInfo::unit()), Box::new(ret));
        }
        params
            .into_iter()
            .rev()
            .fold(ret, |acc, param| TypeInfo::Fn(Box::new(param), Box::new(acc)))
    }

    pub fn is_var(&self) -> bool {
        matches!(self, TypeInfo::Var(_))
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeInfo::Constant(c) => write!(f, "{c}"),
            TypeInfo::Var(v) => write!(f, "{v}"),
            TypeInfo::Fn(input, output) => {
                // Parenthesize a function input so nesting stays readable.
                if matches!(**input, TypeInfo::Fn(..)) {
                    write!(f, "({input}) -> {output}")
                } else {
                    write!(f, "{input} -> {output}")
                }
            }
            TypeInfo::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}
