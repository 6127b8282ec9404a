use log::info;
use std::sync::mpsc::Sender;

/// Receives progress notifications from the population manager.
/// Purely informational: nothing a callback does feeds back into the run.
pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, pool_size: usize, best_fitness: f64);
    fn on_history_trimmed(&mut self, kept: usize);
}

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        info!("Evolution round {} starting.", generation);
    }

    fn on_generation_complete(&mut self, generation: usize, pool_size: usize, best_fitness: f64) {
        info!(
            "Generation {} complete. Pool size: {}, best normalized fitness: {:.4}",
            generation, pool_size, best_fitness
        );
    }

    fn on_history_trimmed(&mut self, kept: usize) {
        info!("Trimmed history to the {} most evolved pools", kept);
    }
}

/// Discards every notification.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, _pool_size: usize, _best_fitness: f64) {}

    fn on_history_trimmed(&mut self, _kept: usize) {}
}

// For handing progress to another thread
pub struct IpcProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { generation: usize, pool_size: usize, best_fitness: f64 },
    HistoryTrimmed(usize),
}

impl IpcProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for IpcProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, generation: usize, pool_size: usize, best_fitness: f64) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            pool_size,
            best_fitness,
        });
    }

    fn on_history_trimmed(&mut self, kept: usize) {
        let _ = self.sender.send(ProgressMessage::HistoryTrimmed(kept));
    }
}
