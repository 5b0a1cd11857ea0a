//! Customer records.

use clap::Subcommand;
use stockdesk_core::validation::customer_input;
use stockdesk_core::{Customer, CustomerQuery, CustomerType};

use super::Context;
use crate::output::{date, or_dash, yes_no};

const CUSTOMERS_PAGE: &str = "/dashboard/customers";

#[derive(Subcommand)]
pub enum CustomersCommand {
    /// List customers
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Match name, email or phone
        #[arg(long)]
        search: Option<String>,
        /// walk-in, regular or wholesale
        #[arg(long = "type")]
        kind: Option<CustomerType>,
    },

    /// Show a customer
    Show { id: String },

    /// Create a customer
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long = "type")]
        kind: Option<CustomerType>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Change a customer; omitted fields keep their value
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long = "type")]
        kind: Option<CustomerType>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a customer
    Delete { id: String },
}

pub async fn run(ctx: &Context, command: CustomersCommand) -> anyhow::Result<()> {
    ctx.open_page(CUSTOMERS_PAGE).await?;
    let api = ctx.client.customers();

    match command {
        CustomersCommand::List {
            page,
            limit,
            search,
            kind,
        } => {
            let query = CustomerQuery {
                page,
                limit,
                search,
                customer_type: kind,
            };
            let customers = api.list(&query).await?;
            ctx.out.page(
                &customers,
                &["ID", "Number", "Name", "Email", "Phone", "Type", "Active"],
                customer_row,
            )
        }

        CustomersCommand::Show { id } => {
            let customer = api.get(&id).await?;
            ctx.out.record(
                &customer,
                vec![
                    ("ID", customer.id.clone()),
                    ("Number", or_dash(customer.customer_number.as_deref())),
                    ("Name", customer.name.clone()),
                    ("Email", or_dash(customer.email.as_deref())),
                    ("Phone", or_dash(customer.phone.as_deref())),
                    ("Type", or_dash(customer.customer_type)),
                    ("Active", yes_no(customer.is_active)),
                    ("Notes", or_dash(customer.notes.as_deref())),
                    ("Created", date(customer.created_at.as_ref())),
                ],
            )
        }

        CustomersCommand::Create {
            name,
            email,
            phone,
            kind,
            notes,
        } => {
            let input = customer_input(
                &name,
                email.as_deref(),
                phone.as_deref(),
                kind,
                notes.as_deref(),
            )?;
            let created = api.create(&input).await?;
            ctx.out.done(
                &created,
                &format!("Created customer {} ({})", created.name, created.id),
            )
        }

        CustomersCommand::Update {
            id,
            name,
            email,
            phone,
            kind,
            notes,
        } => {
            let current = api.get(&id).await?;
            let input = customer_input(
                name.as_deref().unwrap_or(&current.name),
                email.as_deref().or(current.email.as_deref()),
                phone.as_deref().or(current.phone.as_deref()),
                kind.or(current.customer_type),
                notes.as_deref().or(current.notes.as_deref()),
            )?;
            let updated = api.update(&id, &input).await?;
            ctx.out.done(&updated, &format!("Updated customer {}", updated.name))
        }

        CustomersCommand::Delete { id } => {
            api.delete(&id).await?;
            ctx.out.done(&serde_json::json!({ "deleted": id }), "Customer deleted")
        }
    }
}

fn customer_row(customer: &Customer) -> Vec<String> {
    vec![
        customer.id.clone(),
        or_dash(customer.customer_number.as_deref()),
        customer.name.clone(),
        or_dash(customer.email.as_deref()),
        or_dash(customer.phone.as_deref()),
        or_dash(customer.customer_type),
        yes_no(customer.is_active),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_row() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "id": "c-1",
            "name": "Ayesha Khan",
            "phone": "0300-1234567",
            "customerType": "walk-in"
        }))
        .unwrap();
        assert_eq!(
            customer_row(&customer),
            vec!["c-1", "-", "Ayesha Khan", "-", "0300-1234567", "walk-in", "yes"]
        );
    }
}
