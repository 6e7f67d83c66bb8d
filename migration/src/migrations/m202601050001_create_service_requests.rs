use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601050001_create_service_requests"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("service_requests"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("reference_number"))
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Alias::new("first_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("last_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("email")).string().not_null())
                    .col(ColumnDef::new(Alias::new("phone")).string().not_null())
                    .col(ColumnDef::new(Alias::new("address")).text().not_null())
                    .col(ColumnDef::new(Alias::new("postal_code")).string().not_null())
                    .col(ColumnDef::new(Alias::new("city")).string().not_null())
                    .col(ColumnDef::new(Alias::new("connection_type")).string().not_null())
                    .col(ColumnDef::new(Alias::new("power_kva")).integer().null())
                    .col(ColumnDef::new(Alias::new("comments")).text().null())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("service_request_status"),
                                vec![
                                    Alias::new("new"),
                                    Alias::new("in_progress"),
                                    Alias::new("awaiting_payment"),
                                    Alias::new("paid"),
                                    Alias::new("completed"),
                                    Alias::new("cancelled"),
                                ],
                            )
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("service_requests")).to_owned())
            .await
    }
}
