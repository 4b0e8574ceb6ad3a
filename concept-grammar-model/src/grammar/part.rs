use proc_macro2::TokenStream;
use quote::ToTokens;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// An owned grammar fragment, used while rules are being assembled.
///
/// Once a rule is complete it is frozen into a [`PartTree`], which adds the
/// parent links.
#[derive(Debug, Clone)]
pub enum Part {
    Sequence(SequencePart),
    Alternative(AlternativePart),
    Rule(RulePart),
    ZeroOrOne(Box<Part>),
    ZeroOrMore(Box<Part>),
    OneOrMore(Box<Part>),
}

#[derive(Debug, Clone, Default)]
pub struct SequencePart {
    pub parts: Vec<Part>,
    pub associativity: Option<Associativity>,
    /// Code run after the sequence matched.
    pub action: Option<TokenStream>,
}

#[derive(Debug, Clone, Default)]
pub struct AlternativePart {
    pub alternatives: Vec<Part>,
    pub label: Option<String>,
}

/// Reference to a token or to another rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePart {
    pub name: String,
    pub label: Option<String>,
    pub terminal: bool,
}

impl RulePart {
    pub fn terminal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            terminal: true,
        }
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            terminal: false,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl SequencePart {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: impl ToTokens) -> Self {
        self.action = Some(action.into_token_stream());
        self
    }
}

impl AlternativePart {
    pub fn new(alternatives: Vec<Part>) -> Self {
        Self {
            alternatives,
            label: None,
        }
    }
}

impl From<RulePart> for Part {
    fn from(rule: RulePart) -> Self {
        Part::Rule(rule)
    }
}

impl From<SequencePart> for Part {
    fn from(seq: SequencePart) -> Self {
        Part::Sequence(seq)
    }
}

impl From<AlternativePart> for Part {
    fn from(alt: AlternativePart) -> Self {
        Part::Alternative(alt)
    }
}

impl Part {
    pub fn zero_or_one(inner: impl Into<Part>) -> Self {
        Part::ZeroOrOne(Box::new(inner.into()))
    }

    pub fn zero_or_more(inner: impl Into<Part>) -> Self {
        Part::ZeroOrMore(Box::new(inner.into()))
    }

    pub fn one_or_more(inner: impl Into<Part>) -> Self {
        Part::OneOrMore(Box::new(inner.into()))
    }

    pub fn as_rule(&self) -> Option<&RulePart> {
        match self {
            Part::Rule(r) => Some(r),
            _ => None,
        }
    }

    /// True if both parts are the same kind of node, ignoring contents.
    pub fn same_kind(&self, other: &Part) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Structural equality: same kinds, same referenced names, recursively.
    /// Labels and actions are ignored.
    pub fn structure_eq(&self, other: &Part) -> bool {
        match (self, other) {
            (Part::Rule(a), Part::Rule(b)) => a.name == b.name && a.terminal == b.terminal,
            (Part::Sequence(a), Part::Sequence(b)) => parts_structure_eq(&a.parts, &b.parts),
            (Part::Alternative(a), Part::Alternative(b)) => {
                parts_structure_eq(&a.alternatives, &b.alternatives)
            }
            (Part::ZeroOrOne(a), Part::ZeroOrOne(b))
            | (Part::ZeroOrMore(a), Part::ZeroOrMore(b))
            | (Part::OneOrMore(a), Part::OneOrMore(b)) => a.structure_eq(b),
            _ => false,
        }
    }
}

fn parts_structure_eq(a: &[Part], b: &[Part]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structure_eq(y))
}

// ==============================================================================
//  Frozen tree
// ==============================================================================

/// Index of a node inside a [`PartTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(usize);

/// Node-local data. Children are kept by the [`PartTree`].
#[derive(Debug, Clone)]
pub enum PartKind {
    Sequence {
        associativity: Option<Associativity>,
        action: Option<TokenStream>,
    },
    Alternative {
        label: Option<String>,
    },
    Rule(RulePart),
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<PartId>,
    children: Vec<PartId>,
    kind: PartKind,
}

/// A rule body stored as an arena. Each node has exactly one owner (the
/// arena) and a parent index assigned when the tree is built.
#[derive(Debug, Clone)]
pub struct PartTree {
    nodes: Vec<Node>,
}

impl PartTree {
    pub fn root(&self) -> PartId {
        PartId(0)
    }

    pub fn kind(&self, id: PartId) -> &PartKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: PartId) -> Option<PartId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: PartId) -> &[PartId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parents of `id`, innermost first.
    pub fn ancestors(&self, id: PartId) -> impl Iterator<Item = PartId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// The closest sequence containing `id`, i.e. the alternative it belongs to.
    pub fn enclosing_sequence(&self, id: PartId) -> Option<PartId> {
        self.ancestors(id)
            .find(|&p| matches!(self.kind(p), PartKind::Sequence { .. }))
    }

    pub fn depth(&self, id: PartId) -> usize {
        self.ancestors(id).count()
    }

    /// Pre-order walk over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = PartId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }

    /// All token and rule references, in pre-order.
    pub fn rule_refs(&self) -> impl Iterator<Item = &RulePart> + '_ {
        self.iter().filter_map(|id| match self.kind(id) {
            PartKind::Rule(r) => Some(r),
            _ => None,
        })
    }

    fn insert(&mut self, part: Part, parent: Option<PartId>) -> PartId {
        let id = PartId(self.nodes.len());
        let (kind, children) = match part {
            Part::Sequence(seq) => (
                PartKind::Sequence {
                    associativity: seq.associativity,
                    action: seq.action,
                },
                seq.parts,
            ),
            Part::Alternative(alt) => (PartKind::Alternative { label: alt.label }, alt.alternatives),
            Part::Rule(rule) => (PartKind::Rule(rule), Vec::new()),
            Part::ZeroOrOne(inner) => (PartKind::ZeroOrOne, vec![*inner]),
            Part::ZeroOrMore(inner) => (PartKind::ZeroOrMore, vec![*inner]),
            Part::OneOrMore(inner) => (PartKind::OneOrMore, vec![*inner]),
        };
        self.nodes.push(Node {
            parent,
            children: Vec::with_capacity(children.len()),
            kind,
        });
        for child in children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    pub(crate) fn fmt_node(&self, id: PartId, nested: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = self.children(id);
        match self.kind(id) {
            PartKind::Rule(r) => match &r.label {
                Some(label) => write!(f, "{}={}", label, r.name),
                None => write!(f, "{}", r.name),
            },
            PartKind::Sequence {
                associativity,
                action,
            } => {
                let grouped = nested && children.len() != 1;
                if grouped {
                    write!(f, "(")?;
                }
                if *associativity == Some(Associativity::Right) {
                    write!(f, "<assoc=right> ")?;
                }
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    self.fmt_node(*child, true, f)?;
                }
                if let Some(action) = action {
                    write!(f, " {{{}}}", action)?;
                }
                if grouped {
                    write!(f, ")")?;
                }
                Ok(())
            }
            PartKind::Alternative { label } => {
                if let Some(label) = label {
                    write!(f, "{}=", label)?;
                }
                let grouped = nested || label.is_some();
                if grouped {
                    write!(f, "(")?;
                }
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    self.fmt_node(*child, grouped, f)?;
                }
                if grouped {
                    write!(f, ")")?;
                }
                Ok(())
            }
            PartKind::ZeroOrOne | PartKind::ZeroOrMore | PartKind::OneOrMore => {
                let suffix = match self.kind(id) {
                    PartKind::ZeroOrOne => '?',
                    PartKind::ZeroOrMore => '*',
                    _ => '+',
                };
                self.fmt_node(children[0], true, f)?;
                write!(f, "{}", suffix)
            }
        }
    }
}

impl From<Part> for PartTree {
    fn from(part: Part) -> Self {
        let mut tree = PartTree { nodes: Vec::new() };
        tree.insert(part, None);
        tree
    }
}

impl fmt::Display for PartTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root(), false, f)
    }
}
