pub const QUIZ_TEMPLATES: &str = "quizTemplates";
pub const QUIZ_DRAFT: &str = "currentQuizDraft";
pub const PUBLIC_TEMPLATE: &str = "publicQuizTemplate";
pub const RESPONSES: &str = "quizResponses";
pub const RUNNER_STEP: &str = "quizStep";
pub const RUNNER_ANSWERS: &str = "quizAnswers";
/// Id of the quiz the persisted step and answers belong to.
pub const RUNNER_QUIZ_ID: &str = "quizRunnerQuizId";
pub const ADMIN_AUTHENTICATED: &str = "adminAuthenticated";
pub const ADMIN_PANEL_VISIBLE: &str = "adminPanelVisible";

// Server side
pub const PUBLISHED_TEMPLATES: &str = "publishedTemplates";
