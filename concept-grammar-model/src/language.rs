//! The language description consumed by the translator.
//!
//! A [`Language`] is a set of named tokens plus a hierarchy of [`Concept`]s.
//! Each concept lists its concrete notations; patterns attached to concepts,
//! notations and binding parts steer how the grammar is shaped.
//!
//! Everything here is plain data. The builder-style helpers exist so that
//! callers (and tests) can assemble a language without a loader.

/// A complete language description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// Module path under which the concept types live, e.g. `crate::calc`.
    pub package: String,
    pub tokens: Vec<TokenDef>,
    pub concepts: Vec<Concept>,
}

impl Language {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            tokens: Vec::new(),
            concepts: Vec::new(),
        }
    }

    pub fn token(mut self, name: impl Into<String>, regex: impl Into<String>) -> Self {
        self.tokens.push(TokenDef {
            name: name.into(),
            regex: regex.into(),
        });
        self
    }

    pub fn concept(mut self, concept: Concept) -> Self {
        self.concepts.push(concept);
        self
    }

    pub fn find_concept(&self, name: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.name == name)
    }

    /// Concepts without a parent, in declaration order.
    pub fn top_level_concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter().filter(|c| c.parent.is_none())
    }

    /// Direct IS-A children of `parent`, in declaration order.
    pub fn subconcepts<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Concept> + 'a {
        self.concepts
            .iter()
            .filter(move |c| c.parent.as_deref() == Some(parent))
    }
}

/// A named token with its source regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDef {
    pub name: String,
    pub regex: String,
}

/// A node type of the described language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub name: String,
    /// IS-A edge, by concept name.
    pub parent: Option<String>,
    pub properties: Vec<Property>,
    pub notations: Vec<Notation>,
    pub patterns: Vec<ConceptPattern>,
}

impl Concept {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            properties: Vec::new(),
            notations: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn property(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.properties.push(Property::new(name, ty));
        self
    }

    pub fn notation(mut self, notation: Notation) -> Self {
        self.notations.push(notation);
        self
    }

    pub fn pattern(mut self, pattern: ConceptPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// A concept with neither properties nor notations only exists to be specialized.
    pub fn is_abstract(&self) -> bool {
        self.properties.is_empty() && self.notations.is_empty()
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.patterns.iter().find_map(|p| match p {
            ConceptPattern::Operator(op) => Some(op),
            _ => None,
        })
    }

    pub fn parentheses(&self) -> Option<&Parentheses> {
        self.patterns.iter().find_map(|p| match p {
            ConceptPattern::Parentheses(par) => Some(par),
            _ => None,
        })
    }
}

/// A typed property of a concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub ty: Type,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Real,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Array,
    List,
    Set,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Primitive(PrimitiveKind),
    /// Reference to a concept, by name.
    Reference(String),
    Component(ComponentKind, Box<Type>),
}

impl Type {
    pub fn reference(concept: impl Into<String>) -> Self {
        Type::Reference(concept.into())
    }

    pub fn list_of(element: Type) -> Self {
        Type::Component(ComponentKind::List, Box::new(element))
    }

    pub fn array_of(element: Type) -> Self {
        Type::Component(ComponentKind::Array, Box::new(element))
    }

    pub fn set_of(element: Type) -> Self {
        Type::Component(ComponentKind::Set, Box::new(element))
    }

    /// The concept this type names, directly or as a component element.
    pub fn referenced_concept(&self) -> Option<&str> {
        match self {
            Type::Reference(name) => Some(name),
            Type::Component(_, inner) => match inner.as_ref() {
                Type::Reference(name) => Some(name),
                _ => None,
            },
            Type::Primitive(_) => None,
        }
    }
}

/// One concrete surface syntax of a concept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notation {
    pub parts: Vec<NotationPart>,
    pub patterns: Vec<NotationPattern>,
}

impl Notation {
    pub fn new(parts: Vec<NotationPart>) -> Self {
        Self {
            parts,
            patterns: Vec::new(),
        }
    }

    pub fn pattern(mut self, pattern: NotationPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn factory(&self) -> Option<&Factory> {
        self.patterns.iter().map(|NotationPattern::Factory(f)| f).next()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationPart {
    /// A token, either by the name of a declared [`TokenDef`] or as literal text.
    Token(String),
    Binding(BindingPart),
}

impl NotationPart {
    pub fn token(text: impl Into<String>) -> Self {
        NotationPart::Token(text.into())
    }

    pub fn property(name: impl Into<String>, ty: Type) -> Self {
        NotationPart::Binding(BindingPart::new(BindingTarget::Property(Property::new(
            name, ty,
        ))))
    }

    pub fn local(name: impl Into<String>, ty: Type) -> Self {
        NotationPart::Binding(BindingPart::new(BindingTarget::Local {
            name: name.into(),
            ty,
        }))
    }

    /// Attaches a pattern to a binding part; token parts are returned unchanged.
    pub fn with(self, pattern: PartPattern) -> Self {
        match self {
            NotationPart::Binding(mut binding) => {
                binding.patterns.push(pattern);
                NotationPart::Binding(binding)
            }
            token => token,
        }
    }
}

/// A notation part that binds matched input to a property or a local variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPart {
    pub target: BindingTarget,
    pub patterns: Vec<PartPattern>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    Property(Property),
    Local { name: String, ty: Type },
}

impl BindingPart {
    pub fn new(target: BindingTarget) -> Self {
        Self {
            target,
            patterns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        match &self.target {
            BindingTarget::Property(p) => &p.name,
            BindingTarget::Local { name, .. } => name,
        }
    }

    pub fn ty(&self) -> &Type {
        match &self.target {
            BindingTarget::Property(p) => &p.ty,
            BindingTarget::Local { ty, .. } => ty,
        }
    }

    pub fn range(&self) -> Option<Range> {
        self.patterns.iter().find_map(|p| match p {
            PartPattern::Range(r) => Some(*r),
            _ => None,
        })
    }

    pub fn separator(&self) -> Option<&str> {
        self.patterns.iter().find_map(|p| match p {
            PartPattern::Separator(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.patterns.iter().find_map(|p| match p {
            PartPattern::Token(t) => Some(t.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptPattern {
    Operator(Operator),
    Parentheses(Parentheses),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationPattern {
    Factory(Factory),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartPattern {
    Range(Range),
    Separator(String),
    /// Names the token a primitive binding is read from.
    Token(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorAssociativity {
    Left,
    Right,
    /// Accepted for compatibility; treated exactly like `Left`.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    /// Higher binds tighter.
    pub priority: i32,
    pub associativity: OperatorAssociativity,
}

impl Operator {
    pub fn new(priority: i32, associativity: OperatorAssociativity) -> Self {
        Self {
            priority,
            associativity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parentheses {
    pub left: String,
    pub right: String,
}

impl Parentheses {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl Default for Parentheses {
    fn default() -> Self {
        Self::new("(", ")")
    }
}

/// Occurrence bounds of a component binding. `max: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub min: usize,
    pub max: Option<usize>,
}

impl Range {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }
}

impl Default for Range {
    fn default() -> Self {
        Self { min: 0, max: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    pub method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expressions() -> Language {
        Language::new("crate::calc")
            .concept(Concept::new("Expr"))
            .concept(Concept::new("Num").extends("Expr").property(
                "value",
                Type::Primitive(PrimitiveKind::Integer),
            ))
            .concept(Concept::new("Neg").extends("Expr"))
            .concept(Concept::new("Program").property("body", Type::list_of(Type::reference("Expr"))))
    }

    #[test]
    fn test_subconcepts_keep_declaration_order() {
        let lang = expressions();
        let subs: Vec<_> = lang.subconcepts("Expr").map(|c| c.name.as_str()).collect();
        assert_eq!(subs, vec!["Num", "Neg"]);
    }

    #[test]
    fn test_abstract_concepts() {
        let lang = expressions();
        assert!(lang.find_concept("Expr").unwrap().is_abstract());
        assert!(!lang.find_concept("Num").unwrap().is_abstract());
        let top: Vec<_> = lang.top_level_concepts().map(|c| c.name.as_str()).collect();
        assert_eq!(top, vec!["Expr", "Program"]);
    }

    #[test]
    fn test_referenced_concept_looks_through_components() {
        assert_eq!(Type::list_of(Type::reference("Expr")).referenced_concept(), Some("Expr"));
        assert_eq!(Type::reference("Num").referenced_concept(), Some("Num"));
        assert_eq!(Type::Primitive(PrimitiveKind::String).referenced_concept(), None);
        assert_eq!(
            Type::list_of(Type::list_of(Type::reference("Expr"))).referenced_concept(),
            None
        );
    }

    #[test]
    fn test_binding_patterns() {
        let part = NotationPart::property("items", Type::list_of(Type::reference("Expr")))
            .with(PartPattern::Range(Range::between(1, 3)))
            .with(PartPattern::Separator(",".into()));
        let NotationPart::Binding(binding) = part else {
            panic!("expected binding part");
        };
        assert_eq!(binding.name(), "items");
        assert_eq!(binding.range(), Some(Range::between(1, 3)));
        assert_eq!(binding.separator(), Some(","));
        assert_eq!(binding.token(), None);
    }
}
