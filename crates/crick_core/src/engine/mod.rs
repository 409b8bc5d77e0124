pub mod completion;
pub mod processor;

pub use completion::{CompletionDetector, CompletionSignal};
pub use processor::{
    intent_for, DeliveryInput, DeliveryProcessor, ProcessedDelivery, UiIntent, WicketDetails,
};
