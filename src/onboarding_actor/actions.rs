use crate::model::{BrandOnboarding, StepSubmission};

#[derive(Debug, Clone)]
pub enum OnboardingAction {
    /// Re-check step order, then store the step data and recompute progress.
    SaveStep(StepSubmission),
    /// Final submission; refused while any step is missing required fields.
    MarkSubmitted,
}

#[derive(Debug, Clone)]
pub enum OnboardingActionResult {
    SaveStep {
        complete: bool,
        onboarding: BrandOnboarding,
    },
    MarkSubmitted(BrandOnboarding),
}
