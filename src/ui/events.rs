//! Click dispatch by control role.
//!
//! Interactive controls carry a `data-role` attribute naming what they do and,
//! where needed, a `data-id` naming what they act on. A region registers one
//! handler per role in a [DispatchTable] and feeds it every click it receives.

/// What an interactive control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRole {
    RemoveAccount,
    RemoveTransaction,
    CreateIncome,
    CreateExpense,
}

impl ControlRole {
    /// The value of the `data-role` attribute for this role.
    pub fn as_attr(&self) -> &'static str {
        match self {
            ControlRole::RemoveAccount => "remove-account",
            ControlRole::RemoveTransaction => "remove-transaction",
            ControlRole::CreateIncome => "create-income",
            ControlRole::CreateExpense => "create-expense",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "remove-account" => Some(ControlRole::RemoveAccount),
            "remove-transaction" => Some(ControlRole::RemoveTransaction),
            "create-income" => Some(ControlRole::CreateIncome),
            "create-expense" => Some(ControlRole::CreateExpense),
            _ => None,
        }
    }
}

/// One element on the path of a click.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub role: Option<ControlRole>,
    pub data_id: Option<String>,
}

impl Element {
    /// An element without a role, e.g. an icon inside a button.
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn control(role: ControlRole) -> Self {
        Self {
            role: Some(role),
            data_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.data_id = Some(id.into());
        self
    }

    /// Build an element from raw `data-role` and `data-id` attribute values.
    /// Unknown roles are treated as no role.
    pub fn from_attrs(role: Option<&str>, data_id: Option<&str>) -> Self {
        Self {
            role: role.and_then(ControlRole::from_attr),
            data_id: data_id.map(str::to_owned),
        }
    }
}

/// A click, described by the path from the clicked element out towards the
/// root of the region.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    path: Vec<Element>,
}

impl ClickEvent {
    /// A click on `target`.
    pub fn on(target: Element) -> Self {
        Self { path: vec![target] }
    }

    /// Add `ancestor` as the next element out on the path.
    pub fn within(mut self, ancestor: Element) -> Self {
        self.path.push(ancestor);
        self
    }

    pub fn path(&self) -> &[Element] {
        &self.path
    }
}

/// The control that a click activated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation<'a> {
    pub role: ControlRole,
    pub data_id: Option<&'a str>,
}

type Handler = Box<dyn Fn(Activation<'_>)>;

/// Maps control roles to click handlers.
#[derive(Default)]
pub struct DispatchTable {
    handlers: Vec<(ControlRole, Handler)>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` when a control with `role` is activated. A later
    /// registration for the same role replaces the earlier one.
    pub fn on(mut self, role: ControlRole, handler: impl Fn(Activation<'_>) + 'static) -> Self {
        self.handlers.retain(|(existing, _)| *existing != role);
        self.handlers.push((role, Box::new(handler)));
        self
    }

    /// Run the handler for the innermost element on the click path whose role
    /// is registered. Returns false if no handler ran.
    pub fn dispatch(&self, event: &ClickEvent) -> bool {
        for element in event.path() {
            let Some(role) = element.role else {
                continue;
            };

            if let Some((_, handler)) = self.handlers.iter().find(|(existing, _)| *existing == role)
            {
                tracing::debug!("dispatching click on {}", role.as_attr());
                handler(Activation {
                    role,
                    data_id: element.data_id.as_deref(),
                });
                return true;
            }
        }

        false
    }
}
