//! Binds the six configured hotkeys to pointer actions.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};

use crate::config::{Binding, EmulationParameters};
use crate::error::{HkmError, Result};
use crate::hotkey::{HotkeyHandler, HotkeyHost};
use crate::pointer::{MouseButton, Pointer};

/// Pointer shared between all registered handlers.
pub type SharedPointer = Rc<RefCell<dyn Pointer>>;

/// What a binding does when its hotkey fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Move the pointer by a relative offset, applied as an absolute move.
    Move { dx: i32, dy: i32 },
    Click(MouseButton),
}

impl HotkeyAction {
    pub fn for_binding(binding: Binding, speed: u32) -> Self {
        let step = i32::try_from(speed).unwrap_or(i32::MAX);
        match binding {
            Binding::Up => HotkeyAction::Move { dx: 0, dy: -step },
            Binding::Right => HotkeyAction::Move { dx: step, dy: 0 },
            Binding::Down => HotkeyAction::Move { dx: 0, dy: step },
            Binding::Left => HotkeyAction::Move { dx: -step, dy: 0 },
            Binding::LeftClick => HotkeyAction::Click(MouseButton::Left),
            Binding::RightClick => HotkeyAction::Click(MouseButton::Right),
        }
    }

    pub fn perform(&self, pointer: &mut dyn Pointer) -> Result<()> {
        match *self {
            HotkeyAction::Move { dx, dy } => {
                let (x, y) = pointer.position()?;
                pointer.move_to(x.saturating_add(dx), y.saturating_add(dy))
            }
            HotkeyAction::Click(button) => pointer.click(button),
        }
    }
}

/// A binding the host refused.
#[derive(Debug)]
pub struct RegistrationFailure {
    pub binding: Binding,
    pub descriptor: String,
    /// Always [`HkmError::HotkeyRegistration`].
    pub error: HkmError,
}

/// Outcome of one registration pass, one entry per binding.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    pub registered: Vec<(Binding, String)>,
    pub failures: Vec<RegistrationFailure>,
}

impl RegistrationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_bindings(&self) -> Vec<Binding> {
        self.failures.iter().map(|f| f.binding).collect()
    }

    pub fn registered_bindings(&self) -> Vec<Binding> {
        self.registered.iter().map(|(b, _)| *b).collect()
    }
}

/// Registers one global hotkey per binding and remembers what it registered
/// so the set can be released again.
#[derive(Debug, Default)]
pub struct ShortcutRegistrar {
    active: Vec<(Binding, String)>,
}

impl ShortcutRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptors currently held, in registration order.
    pub fn active(&self) -> &[(Binding, String)] {
        &self.active
    }

    /// Register every binding in [`Binding::ALL`] order.
    ///
    /// A failing binding does not stop the others; every failure is recorded
    /// in the report against its own binding and never retried. Deciding what
    /// to do about failures is up to the caller.
    pub fn register_all<H>(
        &mut self,
        params: &EmulationParameters,
        host: &mut H,
        pointer: &SharedPointer,
    ) -> RegistrationReport
    where
        H: HotkeyHost + ?Sized,
    {
        let mut report = RegistrationReport::default();
        let speed = params.movement_speed();

        for binding in Binding::ALL {
            let descriptor = params.descriptor_for(binding);
            let action = HotkeyAction::for_binding(binding, speed);
            let handler = make_handler(binding, action, Rc::clone(pointer));

            match host.register(&descriptor, handler) {
                Ok(()) => {
                    info!(binding = %binding, descriptor = %descriptor, "binding registered");
                    self.active.push((binding, descriptor.clone()));
                    report.registered.push((binding, descriptor));
                }
                Err(e) => {
                    warn!(binding = %binding, descriptor = %descriptor, error = %e, "binding registration failed");
                    let error = HkmError::hotkey_registration(binding.name(), &descriptor, e.to_string());
                    report.failures.push(RegistrationFailure {
                        binding,
                        descriptor,
                        error,
                    });
                }
            }
        }

        report
    }

    /// Release every hotkey registered by this registrar.
    ///
    /// Keeps going past individual failures and returns the first one.
    pub fn unregister_all<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: HotkeyHost + ?Sized,
    {
        let mut first_error = None;

        for (binding, descriptor) in self.active.drain(..) {
            if let Err(e) = host.unregister(&descriptor) {
                warn!(binding = %binding, descriptor = %descriptor, error = %e, "failed to unregister binding");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drop the current bindings and register `params` in their place, so no
    /// handler keeps acting on an outdated configuration.
    pub fn rebind<H>(
        &mut self,
        params: &EmulationParameters,
        host: &mut H,
        pointer: &SharedPointer,
    ) -> Result<RegistrationReport>
    where
        H: HotkeyHost + ?Sized,
    {
        self.unregister_all(host)?;
        Ok(self.register_all(params, host, pointer))
    }
}

fn make_handler(binding: Binding, action: HotkeyAction, pointer: SharedPointer) -> HotkeyHandler {
    Box::new(move || {
        if let Err(e) = action.perform(&mut *pointer.borrow_mut()) {
            warn!(binding = %binding, error = %e, "hotkey action failed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_per_binding() {
        assert_eq!(
            HotkeyAction::for_binding(Binding::Up, 25),
            HotkeyAction::Move { dx: 0, dy: -25 }
        );
        assert_eq!(
            HotkeyAction::for_binding(Binding::Right, 25),
            HotkeyAction::Move { dx: 25, dy: 0 }
        );
        assert_eq!(
            HotkeyAction::for_binding(Binding::Down, 7),
            HotkeyAction::Move { dx: 0, dy: 7 }
        );
        assert_eq!(
            HotkeyAction::for_binding(Binding::Left, 7),
            HotkeyAction::Move { dx: -7, dy: 0 }
        );
        assert_eq!(
            HotkeyAction::for_binding(Binding::LeftClick, 25),
            HotkeyAction::Click(MouseButton::Left)
        );
        assert_eq!(
            HotkeyAction::for_binding(Binding::RightClick, 25),
            HotkeyAction::Click(MouseButton::Right)
        );
    }

    #[test]
    fn test_huge_speed_saturates() {
        assert_eq!(
            HotkeyAction::for_binding(Binding::Right, u32::MAX),
            HotkeyAction::Move {
                dx: i32::MAX,
                dy: 0
            }
        );
    }
}
