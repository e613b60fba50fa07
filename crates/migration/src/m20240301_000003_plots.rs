use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plots::PlotNumber)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plots::OwnerName).string().not_null())
                    .col(ColumnDef::new(Plots::Phone).string().not_null())
                    .col(ColumnDef::new(Plots::Email).string().not_null())
                    .col(
                        ColumnDef::new(Plots::Privatised)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Meter readings share this ledger; `kind` tells them apart.
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::PlotNumber).integer().not_null())
                    .col(ColumnDef::new(Payments::Kind).string().not_null())
                    .col(ColumnDef::new(Payments::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Payments::PaidOn).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-plot_number")
                            .from(Payments::Table, Payments::PlotNumber)
                            .to(Plots::Table, Plots::PlotNumber),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-paid_on")
                    .table(Payments::Table)
                    .col(Payments::PaidOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-plot_number-paid_on")
                    .table(Payments::Table)
                    .col(Payments::PlotNumber)
                    .col(Payments::PaidOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Kind).string().not_null())
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::SpentOn).date().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-spent_on")
                    .table(Expenses::Table)
                    .col(Expenses::SpentOn)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Plots {
    Table,
    PlotNumber,
    OwnerName,
    Phone,
    Email,
    Privatised,
}

#[derive(Iden)]
pub enum Payments {
    Table,
    Id,
    PlotNumber,
    Kind,
    AmountMinor,
    PaidOn,
}

#[derive(Iden)]
pub enum Expenses {
    Table,
    Id,
    Kind,
    AmountMinor,
    SpentOn,
}
