use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::forms::{
    CourseEdit, CourseForm, LoginForm, PasswordReset, UserEdit, UserFields, UserForm,
};
use crate::models::{AdminTab, Course, EntityId, Role, Session, User, View};

/// Feedback for the user. Authentication failures never produce one.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Owns the in-memory session and the client-side copies of server collections.
///
/// Every mutation is followed by a full reload of the affected collection; nothing is
/// patched locally. Any call failing with an authentication error ends the session.
pub struct SessionController {
    api: ApiClient,
    session: Option<Session>,
    admin_tab: AdminTab,
    courses: Vec<Course>,
    my_courses: Vec<Course>,
    users: Vec<User>,
    notices: Vec<Notice>,

    pub login_form: LoginForm,
    pub course_form: CourseForm,
    pub course_edit: Option<CourseEdit>,
    pub user_form: UserForm,
    pub user_edit: Option<UserEdit>,
    pub password_reset: Option<PasswordReset>,
}

impl SessionController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            session: None,
            admin_tab: AdminTab::default(),
            courses: Vec::new(),
            my_courses: Vec::new(),
            users: Vec::new(),
            notices: Vec::new(),
            login_form: LoginForm::default(),
            course_form: CourseForm::default(),
            course_edit: None,
            user_form: UserForm::default(),
            user_edit: None,
            password_reset: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn view(&self) -> View {
        View::for_session(self.session.as_ref())
    }

    pub fn admin_tab(&self) -> AdminTab {
        self.admin_tab
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn my_courses(&self) -> &[Course] {
        &self.my_courses
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn display_name(&self) -> Option<String> {
        self.session.as_ref().map(Session::display_name)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- login / logout ---

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let result = self.api.login(email, password).await;
        let session = self.guard(result)?;

        info!("Logged in as {} ({})", session.user.email, session.role());
        self.session = Some(session);
        self.login_form = LoginForm::default();
        self.admin_tab = AdminTab::Courses;
        self.background_refresh().await;
        Ok(())
    }

    pub async fn submit_login(&mut self) -> Result<(), ApiError> {
        let form = self.login_form.clone();
        self.login(&form.email, &form.password).await
    }

    pub fn logout(&mut self) {
        info!("Logged out");
        self.end_session();
        self.login_form = LoginForm::default();
    }

    // --- loaders ---

    pub async fn load_courses(&mut self) -> Result<(), ApiError> {
        let token = self.require_token()?;
        self.reload_courses(&token).await
    }

    pub async fn load_users(&mut self) -> Result<(), ApiError> {
        let token = self.require_role(Role::Admin)?;
        self.reload_users(&token).await
    }

    pub async fn load_my_courses(&mut self) -> Result<(), ApiError> {
        let token = self.require_token()?;
        self.reload_my_courses(&token).await
    }

    /// Reloads what the active view shows.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        match self.view() {
            View::Login => Ok(()),
            View::Admin => {
                self.load_courses().await?;
                if self.admin_tab == AdminTab::Users {
                    self.load_users().await?;
                }
                Ok(())
            }
            View::Student => {
                self.load_courses().await?;
                self.load_my_courses().await
            }
        }
    }

    pub async fn select_admin_tab(&mut self, tab: AdminTab) -> Result<(), ApiError> {
        self.admin_tab = tab;
        if tab == AdminTab::Users && self.session.is_some() {
            self.load_users().await?;
        }
        Ok(())
    }

    // --- courses ---

    pub async fn create_course(&mut self, name: &str, kind: &str) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let result = self.api.create_course(&token, name, kind).await;
        self.guard(result)?;

        self.course_form = CourseForm::default();
        self.reload_courses(&token).await?;
        self.notify("Course created");
        Ok(())
    }

    pub async fn submit_new_course(&mut self) -> Result<(), ApiError> {
        let form = self.course_form.clone();
        self.create_course(&form.name, &form.kind).await
    }

    pub fn start_edit_course(&mut self, course: &Course) {
        self.course_edit = Some(CourseEdit::from_course(course));
    }

    pub fn cancel_edit_course(&mut self) {
        self.course_edit = None;
    }

    pub async fn update_course(
        &mut self,
        id: &EntityId,
        name: &str,
        kind: &str,
    ) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let result = self.api.update_course(&token, id, name, kind).await;
        self.guard(result)?;

        self.course_edit = None;
        self.reload_courses(&token).await?;
        self.notify("Course updated");
        Ok(())
    }

    pub async fn save_course_edit(&mut self) -> Result<(), ApiError> {
        let Some(edit) = self.course_edit.clone() else {
            return Ok(());
        };
        self.update_course(&edit.id, &edit.name, &edit.kind).await
    }

    pub async fn delete_course(&mut self, id: &EntityId) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let result = self.api.delete_course(&token, id).await;
        self.guard(result)?;

        self.reload_courses(&token).await?;
        self.notify("Course deleted");
        Ok(())
    }

    pub async fn enroll(&mut self, course_id: &EntityId) -> Result<(), ApiError> {
        let token = self.require_role(Role::User)?;
        let result = self.api.enroll(&token, course_id).await;
        self.guard(result)?;

        self.reload_my_courses(&token).await?;
        self.notify("Enrolled");
        Ok(())
    }

    // --- users ---

    pub async fn create_user(&mut self, form: &UserForm) -> Result<(), ApiError> {
        let token = self.require_role(Role::Admin)?;
        let payload = form.to_request();
        let result = self.api.create_user(&token, &payload).await;
        self.guard(result)?;

        self.user_form = UserForm::default();
        self.reload_users(&token).await?;
        self.notify("User created");
        Ok(())
    }

    pub async fn submit_new_user(&mut self) -> Result<(), ApiError> {
        let form = self.user_form.clone();
        self.create_user(&form).await
    }

    pub fn start_edit_user(&mut self, user: &User) {
        self.user_edit = Some(UserEdit {
            id: user.id.clone(),
            fields: UserFields::from_user(user),
        });
    }

    pub fn cancel_edit_user(&mut self) {
        self.user_edit = None;
    }

    pub async fn update_user(&mut self, id: &EntityId, fields: &UserFields) -> Result<(), ApiError> {
        let token = self.require_role(Role::Admin)?;
        let payload = fields.to_request(None);
        let result = self.api.update_user(&token, id, &payload).await;
        self.guard(result)?;

        self.user_edit = None;
        self.reload_users(&token).await?;
        self.notify("User updated");
        Ok(())
    }

    pub async fn save_user_edit(&mut self) -> Result<(), ApiError> {
        let Some(edit) = self.user_edit.clone() else {
            return Ok(());
        };
        self.update_user(&edit.id, &edit.fields).await
    }

    pub async fn delete_user(&mut self, id: &EntityId) -> Result<(), ApiError> {
        let token = self.require_role(Role::Admin)?;
        let result = self.api.delete_user(&token, id).await;
        self.guard(result)?;

        self.reload_users(&token).await?;
        self.notify("User deleted");
        Ok(())
    }

    pub fn start_password_reset(&mut self, user_id: &EntityId) {
        self.password_reset = Some(PasswordReset {
            user_id: user_id.clone(),
            password: String::new(),
        });
    }

    pub fn cancel_password_reset(&mut self) {
        self.password_reset = None;
    }

    pub async fn reset_user_password(
        &mut self,
        id: &EntityId,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let token = self.require_role(Role::Admin)?;
        let result = self.api.reset_password(&token, id, new_password).await;
        self.guard(result)?;

        self.password_reset = None;
        self.notify("Password reset");
        Ok(())
    }

    pub async fn submit_password_reset(&mut self) -> Result<(), ApiError> {
        let Some(reset) = self.password_reset.clone() else {
            return Ok(());
        };
        self.reset_user_password(&reset.user_id, &reset.password).await
    }

    // --- internals ---

    /// Loads run right after login. Failures are swallowed; explicit reloads report them.
    async fn background_refresh(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let token = session.token.as_str();

        let (courses, my_courses, users) = tokio::join!(
            self.api.list_courses(token),
            self.api.list_my_courses(token),
            async {
                if session.is_admin() {
                    Some(self.api.list_users(token).await)
                } else {
                    None
                }
            }
        );

        match courses {
            Ok(courses) => self.courses = courses,
            Err(e) => debug!("Background course load failed: {}", e),
        }
        match my_courses {
            Ok(courses) => self.my_courses = courses,
            Err(e) => debug!("Background my-courses load failed: {}", e),
        }
        match users {
            Some(Ok(users)) => self.users = users,
            Some(Err(e)) => debug!("Background user load failed: {}", e),
            None => {}
        }
    }

    async fn reload_courses(&mut self, token: &str) -> Result<(), ApiError> {
        let result = self.api.list_courses(token).await;
        self.courses = self.guard(result)?;
        Ok(())
    }

    async fn reload_my_courses(&mut self, token: &str) -> Result<(), ApiError> {
        let result = self.api.list_my_courses(token).await;
        self.my_courses = self.guard(result)?;
        Ok(())
    }

    async fn reload_users(&mut self, token: &str) -> Result<(), ApiError> {
        let result = self.api.list_users(token).await;
        self.users = self.guard(result)?;
        Ok(())
    }

    fn require_token(&mut self) -> Result<String, ApiError> {
        if let Some(session) = &self.session {
            return Ok(session.token.clone());
        }
        Err(self.fail(ApiError::missing_token()))
    }

    fn require_role(&mut self, role: Role) -> Result<String, ApiError> {
        let token = self.require_token()?;
        if self.session.as_ref().map(Session::role) != Some(role) {
            return Err(self.fail(ApiError::RoleRequired(role)));
        }
        Ok(token)
    }

    fn guard<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        result.map_err(|e| self.fail(e))
    }

    fn fail(&mut self, err: ApiError) -> ApiError {
        if err.is_auth_failure() {
            info!("Session rejected by server ({}), returning to login", err);
            self.end_session();
        } else {
            warn!("Request failed: {}", err);
            self.notices.push(Notice::Error(err.to_string()));
        }
        err
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(Notice::Success(message.to_string()));
    }

    fn end_session(&mut self) {
        self.session = None;
        self.admin_tab = AdminTab::Courses;
        self.courses.clear();
        self.my_courses.clear();
        self.users.clear();
        self.course_form = CourseForm::default();
        self.course_edit = None;
        self.user_form = UserForm::default();
        self.user_edit = None;
        self.password_reset = None;
    }
}
