use super::shell::ShellId;

slotmap::new_key_type! {
    pub struct SolidId;
}

/// Element body: one outer shell, optionally with cavities.
#[derive(Debug, Clone)]
pub struct SolidData {
    pub outer_shell: ShellId,
    pub inner_shells: Vec<ShellId>,
}

impl SolidData {
    /// Outer shell, then cavities.
    pub fn shells(&self) -> impl Iterator<Item = ShellId> + '_ {
        std::iter::once(self.outer_shell).chain(self.inner_shells.iter().copied())
    }
}
