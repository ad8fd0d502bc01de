use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::lifecycle::ArticleManager;
use crate::media::ImageAttacher;
use crate::models::{Actor, Article, ArticleDraft, Session, Splice, UploadFile};
use crate::search::filter_articles;
use crate::services::{AuthClient, BackendClient, ObjectStorage, StorageClient};
use crate::store::{ArticleStore, RestStore};
use crate::tui::{AppAction, PageMeta, TextBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Listing,
    Detail,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    SignIn,
    Compose,
    UploadPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub field: SignInField,
    pub sign_up: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeField {
    #[default]
    Title,
    Category,
    Image,
    Content,
}

impl ComposeField {
    fn next(self) -> Self {
        match self {
            ComposeField::Title => ComposeField::Category,
            ComposeField::Category => ComposeField::Image,
            ComposeField::Image => ComposeField::Content,
            ComposeField::Content => ComposeField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            ComposeField::Title => ComposeField::Content,
            ComposeField::Category => ComposeField::Title,
            ComposeField::Image => ComposeField::Category,
            ComposeField::Content => ComposeField::Image,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComposeForm {
    pub title: TextBuffer,
    pub category: TextBuffer,
    pub image: TextBuffer,
    pub content: TextBuffer,
    pub field: ComposeField,
}

impl ComposeForm {
    fn focused(&mut self) -> &mut TextBuffer {
        match self.field {
            ComposeField::Title => &mut self.title,
            ComposeField::Category => &mut self.category,
            ComposeField::Image => &mut self.image,
            ComposeField::Content => &mut self.content,
        }
    }

    pub fn draft(&self) -> ArticleDraft {
        let image = self.image.text().trim();
        ArticleDraft {
            title: self.title.text().to_string(),
            content: self.content.text().to_string(),
            category: self.category.text().to_string(),
            image: (!image.is_empty()).then(|| image.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// Remote work running in the background. At most one of each kind is in
/// flight; a second request of the same kind is ignored until it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    LoadListing,
    LoadAdmin,
    OpenArticle,
    RefreshArticle,
    VerifySession,
    SignIn,
    Publish,
    Delete,
    Upload,
}

impl Task {
    pub fn label(self) -> &'static str {
        match self {
            Task::LoadListing => "Loading stories",
            Task::LoadAdmin => "Loading admin desk",
            Task::OpenArticle => "Opening story",
            Task::RefreshArticle => "Refreshing story",
            Task::VerifySession => "Checking session",
            Task::SignIn => "Signing in",
            Task::Publish => "Publishing",
            Task::Delete => "Deleting",
            Task::Upload => "Uploading image",
        }
    }
}

// Message for a finished background task
enum TaskOutcome {
    Listing(Result<Vec<Article>>),
    AdminListing(Result<Vec<Article>>),
    Opened {
        id: Uuid,
        from: Screen,
        result: Result<Article>,
    },
    Refreshed {
        id: Uuid,
        result: Result<Article>,
    },
    SessionChecked {
        session: Session,
        result: Result<Option<Actor>>,
    },
    SignedIn(Result<Option<Session>>),
    Published(Result<Article>),
    Deleted {
        id: Uuid,
        title: String,
        result: Result<()>,
    },
    Attached {
        base: String,
        result: Result<(String, Splice)>,
    },
}

impl TaskOutcome {
    fn task(&self) -> Task {
        match self {
            TaskOutcome::Listing(_) => Task::LoadListing,
            TaskOutcome::AdminListing(_) => Task::LoadAdmin,
            TaskOutcome::Opened { .. } => Task::OpenArticle,
            TaskOutcome::Refreshed { .. } => Task::RefreshArticle,
            TaskOutcome::SessionChecked { .. } => Task::VerifySession,
            TaskOutcome::SignedIn(_) => Task::SignIn,
            TaskOutcome::Published(_) => Task::Publish,
            TaskOutcome::Deleted { .. } => Task::Delete,
            TaskOutcome::Attached { .. } => Task::Upload,
        }
    }
}

pub struct App<S, O> {
    // Data
    pub articles: Vec<Article>,
    pub admin_articles: Vec<Article>,
    pub current_article: Option<Article>,
    pub session: Option<Session>,

    // UI State
    pub screen: Screen,
    pub mode: InputMode,
    pub search_query: String,
    pub selected_index: usize,
    pub admin_index: usize,
    pub show_help: bool,
    pub sign_in: SignInForm,
    pub compose: ComposeForm,
    pub upload_path: String,
    pub notice: Option<Notice>,
    pub page_meta: PageMeta,
    detail_return: Screen,

    // Async state
    pub in_flight: Vec<Task>,
    task_rx: mpsc::Receiver<TaskOutcome>,
    task_tx: mpsc::Sender<TaskOutcome>,

    // Services
    manager: Arc<ArticleManager<S>>,
    attacher: Arc<ImageAttacher<O>>,
    auth: Arc<AuthClient>,
}

impl App<RestStore, StorageClient> {
    pub fn new(config: &Config) -> Result<Self> {
        let backend = BackendClient::new(config)?;
        let manager = ArticleManager::new(
            RestStore::new(backend.clone()),
            config.placeholder_image.clone(),
        );
        let attacher = ImageAttacher::new(
            StorageClient::new(backend.clone()),
            config.media_bucket.clone(),
        );
        let auth = AuthClient::new(backend);

        let mut app = Self::from_parts(manager, attacher, auth);
        app.reload_articles();
        Ok(app)
    }
}

impl<S, O> App<S, O> {
    pub fn visible_articles(&self) -> Vec<&Article> {
        filter_articles(&self.articles, &self.search_query)
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.selected_index).copied()
    }

    pub fn selected_admin_article(&self) -> Option<&Article> {
        self.admin_articles.get(self.admin_index)
    }

    pub fn placeholder_image(&self) -> &str {
        self.manager.placeholder_image()
    }

    /// Label of the most recently started task still running.
    pub fn busy_label(&self) -> Option<&'static str> {
        self.in_flight.last().map(|task| task.label())
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: false,
        });
    }

    /// Logs `err` and turns it into the notice line.
    fn report(&mut self, context: &str, err: AppError) {
        match &err {
            AppError::Validation { .. } | AppError::InvalidFile { .. } | AppError::Unauthorized => {
                tracing::warn!("{}: {}", context, err)
            }
            _ => tracing::error!("{}: {}", context, err),
        }
        self.notice = Some(Notice {
            text: err.notice(),
            is_error: true,
        });
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_articles().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        if self.admin_index >= self.admin_articles.len() {
            self.admin_index = self.admin_articles.len().saturating_sub(1);
        }
    }

    fn close_detail(&mut self) {
        self.current_article = None;
        self.page_meta = PageMeta::site();
    }

    fn forget_article(&mut self, id: Uuid) {
        self.articles.retain(|a| a.id != id);
        self.admin_articles.retain(|a| a.id != id);
        self.clamp_selection();
    }
}

impl<S, O> App<S, O>
where
    S: ArticleStore + Send + Sync + 'static,
    O: ObjectStorage + Send + Sync + 'static,
{
    pub fn from_parts(
        manager: ArticleManager<S>,
        attacher: ImageAttacher<O>,
        auth: AuthClient,
    ) -> Self {
        let (task_tx, task_rx) = mpsc::channel(8);

        Self {
            articles: Vec::new(),
            admin_articles: Vec::new(),
            current_article: None,
            session: None,
            screen: Screen::Listing,
            mode: InputMode::Normal,
            search_query: String::new(),
            selected_index: 0,
            admin_index: 0,
            show_help: false,
            sign_in: SignInForm::default(),
            compose: ComposeForm::default(),
            upload_path: String::new(),
            notice: None,
            page_meta: PageMeta::site(),
            detail_return: Screen::Listing,
            in_flight: Vec::new(),
            task_rx,
            task_tx,
            manager: Arc::new(manager),
            attacher: Arc::new(attacher),
            auth: Arc::new(auth),
        }
    }

    pub fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => match self.screen {
                Screen::Listing => self.selected_index = self.selected_index.saturating_sub(1),
                Screen::Admin => self.admin_index = self.admin_index.saturating_sub(1),
                Screen::Detail => {}
            },

            AppAction::MoveDown => match self.screen {
                Screen::Listing => {
                    let len = self.visible_articles().len();
                    if self.selected_index + 1 < len {
                        self.selected_index += 1;
                    }
                }
                Screen::Admin => {
                    if self.admin_index + 1 < self.admin_articles.len() {
                        self.admin_index += 1;
                    }
                }
                Screen::Detail => {}
            },

            AppAction::OpenArticle => match self.screen {
                Screen::Admin => self.open_admin_article(),
                _ => self.open_selected(),
            },

            AppAction::Back => {
                self.screen = match self.screen {
                    Screen::Detail => self.detail_return,
                    _ => Screen::Listing,
                };
                self.close_detail();
            }

            AppAction::Refresh => match self.screen {
                Screen::Admin => self.reload_admin_articles(),
                Screen::Detail => self.refresh_current(),
                Screen::Listing => self.reload_articles(),
            },

            AppAction::OpenAdmin => self.open_admin(),

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,

            AppAction::StartSearch => self.mode = InputMode::Search,
            AppAction::SearchChar(c) => {
                self.search_query.push(c);
                self.selected_index = 0;
            }
            AppAction::SearchBackspace => {
                self.search_query.pop();
                self.selected_index = 0;
            }
            AppAction::SearchConfirm => self.mode = InputMode::Normal,
            AppAction::SearchCancel => {
                self.search_query.clear();
                self.selected_index = 0;
                self.mode = InputMode::Normal;
            }

            AppAction::DeleteArticle => self.delete_selected(),

            AppAction::NewArticle => {
                self.compose = ComposeForm::default();
                self.mode = InputMode::Compose;
            }

            AppAction::SignOut => self.sign_out(),

            AppAction::SignInChar(c) => match self.sign_in.field {
                SignInField::Email => self.sign_in.email.push(c),
                SignInField::Password => self.sign_in.password.push(c),
            },
            AppAction::SignInBackspace => {
                match self.sign_in.field {
                    SignInField::Email => self.sign_in.email.pop(),
                    SignInField::Password => self.sign_in.password.pop(),
                };
            }
            AppAction::SignInNextField => {
                self.sign_in.field = match self.sign_in.field {
                    SignInField::Email => SignInField::Password,
                    SignInField::Password => SignInField::Email,
                };
            }
            AppAction::SignInToggleMode => self.sign_in.sign_up = !self.sign_in.sign_up,
            AppAction::SignInConfirm => self.submit_sign_in(),
            AppAction::SignInCancel => {
                self.sign_in = SignInForm::default();
                self.mode = InputMode::Normal;
                self.screen = Screen::Listing;
            }

            AppAction::ComposeChar(c) => self.compose.focused().insert(c),
            AppAction::ComposeBackspace => self.compose.focused().backspace(),
            AppAction::ComposeNewline => {
                if self.compose.field == ComposeField::Content {
                    self.compose.content.insert('\n');
                } else {
                    self.compose.field = self.compose.field.next();
                }
            }
            AppAction::ComposeNextField => self.compose.field = self.compose.field.next(),
            AppAction::ComposePrevField => self.compose.field = self.compose.field.prev(),
            AppAction::ComposeCursorLeft => self.compose.focused().move_left(),
            AppAction::ComposeCursorRight => self.compose.focused().move_right(),
            AppAction::ComposeCursorHome => self.compose.focused().move_home(),
            AppAction::ComposeCursorEnd => self.compose.focused().move_end(),
            AppAction::ComposeSubmit => self.submit_article(),
            AppAction::ComposeCancel => self.mode = InputMode::Normal,

            AppAction::AttachImageStart => {
                self.compose.field = ComposeField::Content;
                self.upload_path.clear();
                self.mode = InputMode::UploadPath;
            }
            AppAction::UploadChar(c) => self.upload_path.push(c),
            AppAction::UploadBackspace => {
                self.upload_path.pop();
            }
            AppAction::UploadConfirm => {
                self.attach_image();
                self.mode = InputMode::Compose;
            }
            AppAction::UploadCancel => self.mode = InputMode::Compose,
        }

        Ok(false)
    }

    /// Runs `work` on the runtime and records `task` as in flight.
    fn spawn<F>(&mut self, task: Task, work: F)
    where
        F: Future<Output = TaskOutcome> + Send + 'static,
    {
        if self.in_flight.contains(&task) {
            tracing::debug!("{:?} already in flight, ignoring", task);
            return;
        }
        self.in_flight.push(task);

        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(work.await).await;
        });
    }

    /// Applies every finished task without waiting (non-blocking).
    pub fn poll_tasks(&mut self) {
        while let Ok(outcome) = self.task_rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Waits until nothing is in flight, applying outcomes as they land.
    #[cfg(test)]
    pub async fn settle(&mut self) {
        while !self.in_flight.is_empty() {
            match self.task_rx.recv().await {
                Some(outcome) => self.apply(outcome),
                None => break,
            }
        }
    }

    fn apply(&mut self, outcome: TaskOutcome) {
        let task = outcome.task();
        if let Some(pos) = self.in_flight.iter().position(|t| *t == task) {
            self.in_flight.remove(pos);
        }

        match outcome {
            TaskOutcome::Listing(result) => {
                match result {
                    Ok(articles) => self.articles = articles,
                    Err(e) => {
                        self.articles.clear();
                        self.report("Failed to load articles", e);
                    }
                }
                self.clamp_selection();
            }

            TaskOutcome::AdminListing(result) => {
                // Signed out while loading
                if self.session.is_none() {
                    return;
                }
                match result {
                    Ok(articles) => self.admin_articles = articles,
                    Err(e) => {
                        self.admin_articles.clear();
                        self.report("Failed to load admin articles", e);
                    }
                }
                self.clamp_selection();
            }

            TaskOutcome::Opened { id, from, result } => self.on_opened(id, from, result),
            TaskOutcome::Refreshed { id, result } => self.on_refreshed(id, result),
            TaskOutcome::SessionChecked { session, result } => {
                self.on_session_checked(session, result)
            }
            TaskOutcome::SignedIn(result) => self.on_signed_in(result),

            TaskOutcome::Published(result) => match result {
                Ok(article) => {
                    self.info(format!("Published \"{}\"", article.title));
                    self.compose = ComposeForm::default();
                    if self.mode == InputMode::Compose {
                        self.mode = InputMode::Normal;
                    }
                    self.reload_admin_articles();
                    self.reload_articles();
                }
                Err(e) => self.report("Failed to publish article", e),
            },

            TaskOutcome::Deleted { id, title, result } => match result {
                Ok(()) => {
                    self.forget_article(id);
                    self.info(format!("Deleted \"{title}\""));
                }
                Err(e) => self.report("Failed to delete article", e),
            },

            TaskOutcome::Attached { base, result } => match result {
                Ok((file_name, splice)) => {
                    if self.compose.content.text() == base {
                        self.compose.content.apply(splice);
                        self.info(format!("Inserted {file_name}"));
                    } else {
                        tracing::warn!("Content changed during upload of {}", file_name);
                        self.info("Draft changed during upload, image not inserted");
                    }
                }
                Err(e) => self.report("Image upload failed", e),
            },
        }
    }

    /// Reloads the public listing; a failure leaves it empty.
    pub fn reload_articles(&mut self) {
        let manager = Arc::clone(&self.manager);
        self.spawn(Task::LoadListing, async move {
            TaskOutcome::Listing(manager.list_published().await)
        });
    }

    fn reload_admin_articles(&mut self) {
        let manager = Arc::clone(&self.manager);
        let session = self.session.clone();
        self.spawn(Task::LoadAdmin, async move {
            TaskOutcome::AdminListing(manager.list_all(session.as_ref()).await)
        });
    }

    fn open_selected(&mut self) {
        let Some(id) = self.selected_article().map(|a| a.id) else {
            return;
        };

        let manager = Arc::clone(&self.manager);
        self.spawn(Task::OpenArticle, async move {
            let result = manager.get_published(id).await;
            TaskOutcome::Opened {
                id,
                from: Screen::Listing,
                result,
            }
        });
    }

    fn open_admin_article(&mut self) {
        let Some(id) = self.selected_admin_article().map(|a| a.id) else {
            return;
        };

        let manager = Arc::clone(&self.manager);
        let session = self.session.clone();
        self.spawn(Task::OpenArticle, async move {
            let result = manager.get_for_admin(session.as_ref(), id).await;
            TaskOutcome::Opened {
                id,
                from: Screen::Admin,
                result,
            }
        });
    }

    fn on_opened(&mut self, id: Uuid, from: Screen, result: Result<Article>) {
        // Navigated away while loading
        if self.screen != from {
            return;
        }

        match result {
            Ok(article) => {
                self.page_meta = PageMeta::for_article(&article, self.placeholder_image());
                self.current_article = Some(article);
                self.detail_return = from;
                self.screen = Screen::Detail;
            }
            Err(e) => {
                if matches!(e, AppError::NotFound) {
                    self.forget_article(id);
                }
                self.report("Failed to open article", e);
            }
        }
    }

    fn refresh_current(&mut self) {
        let Some(id) = self.current_article.as_ref().map(|a| a.id) else {
            return;
        };

        let manager = Arc::clone(&self.manager);
        let session = self.session.clone();
        let admin = self.detail_return == Screen::Admin;
        self.spawn(Task::RefreshArticle, async move {
            let result = if admin {
                manager.get_for_admin(session.as_ref(), id).await
            } else {
                manager.get_published(id).await
            };
            TaskOutcome::Refreshed { id, result }
        });
    }

    fn on_refreshed(&mut self, id: Uuid, result: Result<Article>) {
        let showing = self.screen == Screen::Detail
            && self.current_article.as_ref().is_some_and(|a| a.id == id);
        if !showing {
            return;
        }

        match result {
            Ok(article) => {
                let copies = self.articles.iter_mut().chain(&mut self.admin_articles);
                for slot in copies {
                    if slot.id == id {
                        *slot = article.clone();
                    }
                }
                self.page_meta = PageMeta::for_article(&article, self.placeholder_image());
                self.current_article = Some(article);
            }
            Err(AppError::NotFound) => {
                self.forget_article(id);
                self.close_detail();
                self.screen = self.detail_return;
                self.report("Story is no longer available", AppError::NotFound);
            }
            Err(e) => self.report("Failed to refresh article", e),
        }
    }

    fn open_admin(&mut self) {
        self.close_detail();
        self.screen = Screen::Admin;
        let Some(session) = self.session.clone() else {
            self.mode = InputMode::SignIn;
            return;
        };

        let auth = Arc::clone(&self.auth);
        self.spawn(Task::VerifySession, async move {
            let result = auth.current_actor(&session).await;
            TaskOutcome::SessionChecked { session, result }
        });
    }

    fn on_session_checked(&mut self, checked: Session, result: Result<Option<Actor>>) {
        // Signed out or switched accounts while checking
        let current = self
            .session
            .as_ref()
            .is_some_and(|s| s.access_token == checked.access_token);
        if !current {
            return;
        }

        match result {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.session = None;
                self.admin_articles.clear();
                if self.screen == Screen::Admin {
                    self.mode = InputMode::SignIn;
                }
                self.info("Session expired, please sign in again");
                return;
            }
            // Keep the session; the admin listing will surface any outage
            Err(e) => tracing::warn!("Could not verify session: {}", e),
        }

        self.reload_admin_articles();
    }

    fn submit_sign_in(&mut self) {
        let email = self.sign_in.email.trim().to_string();
        let password = self.sign_in.password.clone();
        if email.is_empty() || password.is_empty() {
            self.report(
                "Sign-in rejected",
                AppError::Auth("Email and password are required".to_string()),
            );
            return;
        }

        let auth = Arc::clone(&self.auth);
        let sign_up = self.sign_in.sign_up;
        self.spawn(Task::SignIn, async move {
            let result = if sign_up {
                auth.sign_up(&email, &password).await
            } else {
                auth.sign_in(&email, &password).await.map(Some)
            };
            TaskOutcome::SignedIn(result)
        });
    }

    fn on_signed_in(&mut self, result: Result<Option<Session>>) {
        match result {
            Ok(Some(session)) => {
                self.info(format!("Signed in as {}", session.display_name()));
                self.session = Some(session);
                self.sign_in = SignInForm::default();
                if self.mode == InputMode::SignIn {
                    self.mode = InputMode::Normal;
                    self.screen = Screen::Admin;
                }
                self.reload_admin_articles();
            }
            Ok(None) => {
                self.sign_in.sign_up = false;
                self.sign_in.password.clear();
                self.info("Check your email to confirm the account, then sign in");
            }
            Err(e) => {
                self.sign_in.password.clear();
                self.report("Sign-in failed", e);
            }
        }
    }

    fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            let auth = Arc::clone(&self.auth);
            tokio::spawn(async move {
                if let Err(e) = auth.sign_out(&session).await {
                    tracing::warn!("Sign-out request failed: {}", e);
                }
            });
        }
        self.admin_articles.clear();
        self.admin_index = 0;
        self.compose = ComposeForm::default();
        self.mode = InputMode::Normal;
        self.screen = Screen::Listing;
        self.info("Signed out");
    }

    fn delete_selected(&mut self) {
        let Some(article) = self.selected_admin_article() else {
            return;
        };
        let id = article.id;
        let title = article.title.clone();

        let manager = Arc::clone(&self.manager);
        let session = self.session.clone();
        self.spawn(Task::Delete, async move {
            let result = manager.delete(session.as_ref(), id).await;
            TaskOutcome::Deleted { id, title, result }
        });
    }

    fn submit_article(&mut self) {
        let draft = self.compose.draft();
        let manager = Arc::clone(&self.manager);
        let session = self.session.clone();
        self.spawn(Task::Publish, async move {
            TaskOutcome::Published(manager.create(session.as_ref(), &draft).await)
        });
    }

    fn attach_image(&mut self) {
        let path = expand_home(self.upload_path.trim());
        let base = self.compose.content.text().to_string();
        let cursor = self.compose.content.cursor();
        let attacher = Arc::clone(&self.attacher);
        let session = self.session.clone();

        self.spawn(Task::Upload, async move {
            let result =
                attach_from_path(&attacher, session.as_ref(), &path, &base, cursor).await;
            TaskOutcome::Attached { base, result }
        });
    }
}

/// Reads the file at `path` and attaches it; returns the file name with the splice.
async fn attach_from_path<O: ObjectStorage>(
    attacher: &ImageAttacher<O>,
    session: Option<&Session>,
    path: &Path,
    content: &str,
    cursor: usize,
) -> Result<(String, Splice)> {
    let file = UploadFile::from_path(path)?;
    let splice = attacher.attach(session, &file, content, cursor).await?;
    Ok((file.file_name, splice))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
