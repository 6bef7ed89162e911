//! User administration handlers.

use tabled::Tabled;

use society_core::types::{Role, User, UserStatus};
use society_core::validation::UserUpdateForm;
use society_core::{Command as CoreCommand, CommandResult, FilterSet, Society, UserFilter};

use crate::cli::{GlobalOpts, OutputFormat, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::auth::user_detail;
use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Flat")]
    flat: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        let flat = match (&u.building, &u.flat_number) {
            (Some(b), Some(f)) => format!("{b}-{f}"),
            (None, Some(f)) => f.clone(),
            _ => String::new(),
        };
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            flat,
            role: u.role.to_string(),
            status: u.status.to_string(),
        }
    }
}

pub async fn handle(
    society: &Society,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List {
            role,
            status,
            search,
            page,
        } => {
            let mut query = util::page_query(&page);
            let mut filters = FilterSet::new();
            if let Some(r) = role {
                let r: Role = r.into();
                query.role = Some(r.to_string());
                filters.push(UserFilter::Role(r));
            }
            if let Some(s) = status {
                let s: UserStatus = s.into();
                query.status = Some(s.to_string());
                filters.push(UserFilter::Status(s));
            }
            if let Some(q) = search {
                query.search = Some(q.clone());
                filters.push(UserFilter::Search(q));
            }

            let result = society.users(&query).await?;
            let users: Vec<User> = filters
                .apply(result.items.as_slice())
                .into_iter()
                .cloned()
                .collect();
            let out = output::render_list(global.output, &users, |u| UserRow::from(u), |u| {
                u.id.clone()
            });
            output::print_output(&out, global.quiet);
            if global.output == OutputFormat::Table {
                let p = &result.pagination;
                output::notice(
                    &output::page_footer(p.current_page, p.total_pages, p.total_items),
                    global.quiet,
                );
            }
            Ok(())
        }

        UsersCommand::Show { id } => {
            let user = society.user(&id).await?;
            let out = output::render_single(global.output, &user, user_detail, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Update {
            id,
            name,
            email,
            phone,
            role,
            status,
            flat,
            building,
        } => {
            let form = UserUpdateForm {
                name,
                email,
                phone,
                role: role.map(Into::into),
                status: status.map(Into::into),
                flat_number: flat,
                building,
            };
            let result = society.execute(CoreCommand::UpdateUser { id, form }).await?;
            let CommandResult::User(user) = result else {
                return Err(CliError::Internal("unexpected result".into()));
            };
            output::notice(&format!("Updated {}", user.email), global.quiet);
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete user '{id}'? This cannot be undone."),
                global.yes,
            )? {
                return Ok(());
            }
            society.execute(CoreCommand::DeleteUser { id }).await?;
            output::notice("User deleted", global.quiet);
            Ok(())
        }
    }
}
