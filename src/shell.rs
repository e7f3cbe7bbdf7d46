//! Line-oriented front end for the session controller.

use tokio::io::{AsyncBufReadExt, BufReader};

use campus_client::forms::{UserFields, UserForm};
use campus_client::models::{AdminTab, Course, EntityId, Role, View};
use campus_client::{Notice, SessionController};

const HELP: &str = "\
commands:
  login EMAIL PASSWORD            logout
  refresh                         tab courses|users
  course-add NAME TYPE            course-edit ID NAME TYPE
  course-del ID                   enroll ID
  user-add EMAIL PASSWORD ROLE [FIRST LAST BIRTH_DATE PREV_EDUCATION AVG_GRADE]
  user-edit ID EMAIL ROLE [FIRST LAST BIRTH_DATE PREV_EDUCATION AVG_GRADE]
  user-del ID                     passwd ID NEW_PASSWORD
  show                            help | quit
arguments containing spaces can be wrapped in double quotes";

pub async fn run(mut controller: SessionController) -> std::io::Result<()> {
    println!("Smart University");
    render(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let args = split_args(&line);
        let Some((command, rest)) = args.split_first() else {
            continue;
        };

        match command.as_str() {
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "show" => render(&controller),
            _ => {
                if let Err(usage) = dispatch(&mut controller, command, rest).await {
                    println!("usage: {}", usage);
                    continue;
                }
                print_notices(&mut controller);
                render(&controller);
            }
        }
    }
    Ok(())
}

/// Failures surface as notices, so operation results are dropped here.
/// `Err` only carries usage text for malformed input.
async fn dispatch(
    controller: &mut SessionController,
    command: &str,
    args: &[String],
) -> Result<(), &'static str> {
    match (command, args) {
        ("login", [email, password]) => {
            controller.login_form.email = email.clone();
            controller.login_form.password = password.clone();
            let _ = controller.submit_login().await;
        }
        ("logout", []) => controller.logout(),
        ("refresh", []) => {
            let _ = controller.refresh().await;
        }
        ("tab", [tab]) => {
            let tab = match tab.as_str() {
                "courses" => AdminTab::Courses,
                "users" => AdminTab::Users,
                _ => return Err("tab courses|users"),
            };
            let _ = controller.select_admin_tab(tab).await;
        }
        ("course-add", [name, kind]) => {
            controller.course_form.name = name.clone();
            controller.course_form.kind = kind.clone();
            let _ = controller.submit_new_course().await;
        }
        ("course-edit", [id, name, kind]) => {
            let id = EntityId::from(id.as_str());
            match find_course(controller.courses(), &id) {
                Some(course) => controller.start_edit_course(&course),
                None => return Err("course-edit ID NAME TYPE (ID must be listed)"),
            }
            if let Some(edit) = controller.course_edit.as_mut() {
                edit.name = name.clone();
                edit.kind = kind.clone();
            }
            let _ = controller.save_course_edit().await;
        }
        ("course-del", [id]) => {
            let _ = controller.delete_course(&EntityId::from(id.as_str())).await;
        }
        ("enroll", [id]) => {
            let _ = controller.enroll(&EntityId::from(id.as_str())).await;
        }
        ("user-add", [email, password, role, extra @ ..]) => {
            let mut fields = UserFields {
                email: email.clone(),
                role: Role::from(role.clone()),
                ..UserFields::default()
            };
            apply_profile(&mut fields, extra)?;
            controller.user_form = UserForm {
                password: password.clone(),
                fields,
            };
            let _ = controller.submit_new_user().await;
        }
        ("user-edit", [id, email, role, extra @ ..]) => {
            let id = EntityId::from(id.as_str());
            let Some(user) = controller.users().iter().find(|u| u.id == id).cloned() else {
                return Err("user-edit ID EMAIL ROLE [...] (ID must be listed)");
            };
            controller.start_edit_user(&user);
            if let Some(edit) = controller.user_edit.as_mut() {
                edit.fields.email = email.clone();
                edit.fields.role = Role::from(role.clone());
                apply_profile(&mut edit.fields, extra)?;
            }
            let _ = controller.save_user_edit().await;
        }
        ("user-del", [id]) => {
            let _ = controller.delete_user(&EntityId::from(id.as_str())).await;
        }
        ("passwd", [id, password]) => {
            controller.start_password_reset(&EntityId::from(id.as_str()));
            if let Some(reset) = controller.password_reset.as_mut() {
                reset.password = password.clone();
            }
            let _ = controller.submit_password_reset().await;
        }
        _ => return Err("unknown command or wrong arguments, try `help`"),
    }
    Ok(())
}

fn apply_profile(fields: &mut UserFields, extra: &[String]) -> Result<(), &'static str> {
    match extra {
        [] => Ok(()),
        [first, last, birth_date, previous_education, average_grade] => {
            fields.first_name = first.clone();
            fields.last_name = last.clone();
            fields.birth_date = birth_date.clone();
            fields.previous_education = previous_education.clone();
            fields.average_grade = average_grade.clone();
            Ok(())
        }
        _ => Err("profile needs FIRST LAST BIRTH_DATE PREV_EDUCATION AVG_GRADE (use \"\" for blanks)"),
    }
}

fn find_course(courses: &[Course], id: &EntityId) -> Option<Course> {
    courses.iter().find(|c| &c.id == id).cloned()
}

fn print_notices(controller: &mut SessionController) {
    for notice in controller.take_notices() {
        match notice {
            Notice::Success(message) => println!("ok: {}", message),
            Notice::Error(message) => println!("error: {}", message),
        }
    }
}

fn render(controller: &SessionController) {
    match controller.view() {
        View::Login => println!("[login] use `login EMAIL PASSWORD`"),
        View::Admin => {
            print_header(controller);
            match controller.admin_tab() {
                AdminTab::Courses => {
                    println!("[admin: courses]");
                    print_courses(controller.courses());
                }
                AdminTab::Users => {
                    println!("[admin: users]");
                    for user in controller.users() {
                        let name = format!(
                            "{} {}",
                            user.first_name.as_deref().unwrap_or(""),
                            user.last_name.as_deref().unwrap_or("")
                        );
                        let name = name.trim();
                        if name.is_empty() {
                            println!("  {:>4}  {}  role: {}", user.id, user.email, user.role);
                        } else {
                            println!("  {:>4}  {}  role: {} | {}", user.id, user.email, user.role, name);
                        }
                    }
                }
            }
        }
        View::Student => {
            print_header(controller);
            println!("[student] all courses");
            print_courses(controller.courses());
            println!("[student] my courses");
            print_courses(controller.my_courses());
        }
    }
}

fn print_header(controller: &SessionController) {
    if let Some(session) = controller.session() {
        println!("{} | Role: {}", session.display_name(), session.role());
    }
}

fn print_courses(courses: &[Course]) {
    for course in courses {
        println!("  {:>4}  {} - {}", course.id, course.name, course.kind);
    }
}

/// Whitespace-separated arguments; double quotes group words and `""` is an empty argument.
fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args_handles_quotes() {
        assert_eq!(split_args("course-add Algebra core"), vec!["course-add", "Algebra", "core"]);
        assert_eq!(
            split_args(r#"course-add "Linear Algebra"  core"#),
            vec!["course-add", "Linear Algebra", "core"]
        );
        assert_eq!(split_args(r#"a "" b"#), vec!["a", "", "b"]);
        assert!(split_args("   ").is_empty());
    }
}
