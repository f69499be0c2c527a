use crate::error::Result;
use crate::error::SeedError;
use tokio::sync::mpsc;

/// Outcome of one dispatched topic: number of messages published, or why it failed.
#[derive(Debug)]
pub struct Completion {
    pub topic:  String,
    pub result: Result<usize>,
}

/// Single-use ticket handed to a dispatch. Completing consumes it.
#[derive(Debug)]
pub struct CompletionHandle {
    sender: mpsc::UnboundedSender<Completion>,
}

impl CompletionHandle {
    pub fn complete(self, topic: impl Into<String>, result: Result<usize>) {
        let completion = Completion { topic: topic.into(), result };
        if let Err(err) = self.sender.send(completion) {
            warn!("Completion for {} arrived after the gate closed", err.0.topic);
        }
    }
}

/// Waits for a fixed number of completions, in whatever order they arrive.
pub struct CompletionGate {
    expected: usize,
    sender:   mpsc::UnboundedSender<Completion>,
    receiver: mpsc::UnboundedReceiver<Completion>,
}

impl CompletionGate {
    pub fn new(expected: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        CompletionGate { expected, sender, receiver }
    }

    pub fn handle(&self) -> CompletionHandle { CompletionHandle { sender: self.sender.clone() } }

    /// Resolves once `expected` completions arrived, or earlier if every handle was
    /// dropped without completing.
    pub async fn wait(self) -> GateReport {
        let CompletionGate {
            expected,
            sender,
            mut receiver,
        } = self;
        drop(sender);

        let mut completions = Vec::with_capacity(expected);
        while completions.len() < expected {
            match receiver.recv().await {
                Some(completion) => {
                    match &completion.result {
                        Ok(count) => info!("Published {} messages to {} ({}/{})", count, completion.topic, completions.len() + 1, expected),
                        Err(err) => error!("{} ({}/{})", err, completions.len() + 1, expected),
                    }
                    completions.push(completion);
                },
                None => {
                    warn!("Gate closed with {} of {} completions", completions.len(), expected);
                    break;
                },
            }
        }
        GateReport { expected, completions }
    }
}

#[derive(Debug)]
pub struct GateReport {
    pub expected:    usize,
    pub completions: Vec<Completion>,
}

impl GateReport {
    pub fn is_complete(&self) -> bool { self.completions.len() == self.expected }

    pub fn failures(&self) -> impl Iterator<Item = &Completion> { self.completions.iter().filter(|c| c.result.is_err()) }

    /// Failed plus never completed dispatches.
    pub fn failed(&self) -> usize { self.failures().count() + (self.expected - self.completions.len()) }

    pub fn published(&self) -> usize { self.completions.iter().filter_map(|c| c.result.as_ref().ok()).sum() }

    /// `lenient` accepts failed publishes as long as every dispatch reported back.
    pub fn into_result(self, lenient: bool) -> Result<GateReport> {
        let failed = self.failed();
        if failed == 0 || (lenient && self.is_complete()) {
            if failed > 0 {
                warn!("Ignoring {} failed publishes", failed);
            }
            Ok(self)
        } else {
            Err(SeedError::Incomplete {
                failed,
                expected: self.expected,
            })
        }
    }
}
