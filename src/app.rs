//! Application context and lifecycle.
//!
//! [`AppContext`] is created once at startup and handed to the two
//! lifecycle handlers: [`AppContext::on_ready`] loads the configuration and
//! registers the hotkeys, [`AppContext::on_all_windows_closed`] releases
//! them and writes the configuration back.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::EmulationParameters;
use crate::error::{HkmError, Result};
use crate::hotkey::{GlobalHotkeyHost, HotkeyHost};
use crate::notify::{ConsoleNotifier, Notifier};
use crate::platform;
use crate::pointer::EnigoPointer;
use crate::registrar::{RegistrationReport, SharedPointer, ShortcutRegistrar};

/// How often pending hotkey events are drained.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What to do when one or more bindings cannot be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Tell the user, then shut down.
    #[default]
    Quit,
    /// Tell the user and let them choose between running with the remaining
    /// bindings and shutting down.
    Continue,
}

pub struct AppContext {
    config_path: PathBuf,
    policy: FailurePolicy,
    params: Option<EmulationParameters>,
    registrar: ShortcutRegistrar,
}

impl AppContext {
    pub fn new(config_path: impl Into<PathBuf>, policy: FailurePolicy) -> Self {
        Self {
            config_path: config_path.into(),
            policy,
            params: None,
            registrar: ShortcutRegistrar::new(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The loaded parameters, once [`AppContext::on_ready`] got that far.
    pub fn params(&self) -> Option<&EmulationParameters> {
        self.params.as_ref()
    }

    pub fn params_mut(&mut self) -> Option<&mut EmulationParameters> {
        self.params.as_mut()
    }

    pub fn registrar(&self) -> &ShortcutRegistrar {
        &self.registrar
    }

    /// Load and validate the configuration, then register every binding.
    ///
    /// Load and validation errors are shown to the user and returned; no
    /// hotkey is registered in that case. Each failed binding is shown to the
    /// user separately until they pick "Quit", which is the only choice under
    /// [`FailurePolicy::Quit`]. The error of the binding they quit on is
    /// returned.
    pub fn on_ready(
        &mut self,
        host: &mut dyn HotkeyHost,
        pointer: &SharedPointer,
        notifier: &mut dyn Notifier,
    ) -> Result<RegistrationReport> {
        let params = match EmulationParameters::load(&self.config_path) {
            Ok(params) => params,
            Err(e) => {
                error!(error = %e, "failed to load emulation parameters");
                notifier.show_message(&e.to_string(), &["OK"]);
                return Err(e);
            }
        };

        if let Err(e) = params.validate() {
            error!(error = %e, "emulation parameters rejected");
            notifier.show_message(&e.to_string(), &["OK"]);
            return Err(e);
        }

        let params = self.params.insert(params);
        let mut report = self.registrar.register_all(params, host, pointer);

        let mut quit_on = None;
        for (index, failure) in report.failures.iter().enumerate() {
            let message = format!(
                "Could not register the {} shortcut ({}). It may already be used by another application.",
                failure.binding, failure.descriptor
            );
            let choice = match self.policy {
                FailurePolicy::Quit => {
                    notifier.show_message(&message, &["Quit"]);
                    1
                }
                FailurePolicy::Continue => notifier.show_message(&message, &["Continue", "Quit"]),
            };
            if choice == 1 {
                quit_on = Some(index);
                break;
            }
        }

        if let Some(index) = quit_on {
            let failure = report.failures.swap_remove(index);
            return Err(failure.error);
        }

        info!(
            registered = report.registered.len(),
            failed = report.failures.len(),
            "hotkeys ready"
        );
        Ok(report)
    }

    /// Release all hotkeys and save the configuration.
    ///
    /// Nothing is saved if the configuration was never loaded. A failed save
    /// is shown to the user and returned.
    pub fn on_all_windows_closed(
        &mut self,
        host: &mut dyn HotkeyHost,
        notifier: &mut dyn Notifier,
    ) -> Result<()> {
        if let Err(e) = self.registrar.unregister_all(host) {
            warn!(error = %e, "failed to release all hotkeys");
        }

        let Some(params) = &self.params else {
            debug!("no configuration loaded, nothing to save");
            return Ok(());
        };

        if let Err(e) = params.save(&self.config_path) {
            error!(error = %e, "failed to save emulation parameters");
            notifier.show_message(&e.to_string(), &["OK"]);
            return Err(e);
        }

        Ok(())
    }
}

/// Run the tool until Ctrl-C: start up, dispatch hotkey events on this
/// thread, then shut down.
///
/// Shutdown (release and save) also runs when startup fails after the
/// configuration was loaded.
pub async fn run(config_path: PathBuf, policy: FailurePolicy) -> Result<()> {
    let mut host = GlobalHotkeyHost::new()?;
    let pointer: SharedPointer = Rc::new(RefCell::new(EnigoPointer::new()?));
    let mut notifier = ConsoleNotifier;
    let mut context = AppContext::new(config_path, policy);

    let outcome = match context.on_ready(&mut host, &pointer, &mut notifier) {
        Ok(_) => run_event_loop(&mut host).await,
        Err(e) => Err(e),
    };

    let closed = context.on_all_windows_closed(&mut host, &mut notifier);
    outcome.and(closed)
}

async fn run_event_loop(host: &mut GlobalHotkeyHost) -> Result<()> {
    let mut tick = tokio::time::interval(POLL_INTERVAL);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("listening for hotkeys, press Ctrl-C to exit");
    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.map_err(HkmError::from)?;
                info!("shutdown requested");
                return Ok(());
            }
            _ = tick.tick() => {
                platform::pump_events();
                host.poll();
            }
        }
    }
}
