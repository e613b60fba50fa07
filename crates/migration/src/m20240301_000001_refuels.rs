use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Refuels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Refuels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Refuels::VehicleNumber).string().not_null())
                    .col(ColumnDef::new(Refuels::FuelDate).date().not_null())
                    .col(ColumnDef::new(Refuels::FuelCard).string())
                    .col(ColumnDef::new(Refuels::PreviousMileage).big_integer().not_null())
                    .col(ColumnDef::new(Refuels::CurrentMileage).big_integer().not_null())
                    .col(ColumnDef::new(Refuels::DieselLiters).double().not_null())
                    .col(ColumnDef::new(Refuels::Currency).string().not_null())
                    .col(ColumnDef::new(Refuels::DieselPrice).double().not_null())
                    .col(ColumnDef::new(Refuels::DieselCost).double().not_null())
                    .col(ColumnDef::new(Refuels::FullTank).boolean().not_null())
                    .col(
                        ColumnDef::new(Refuels::AdblueLiters)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Refuels::AdbluePrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Refuels::AdblueCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Refuels::Distance).big_integer().not_null())
                    .col(ColumnDef::new(Refuels::AverageConsumption).double().not_null())
                    .col(ColumnDef::new(Refuels::TotalCost).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-refuels-vehicle_number-fuel_date")
                    .table(Refuels::Table)
                    .col(Refuels::VehicleNumber)
                    .col(Refuels::FuelDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Refuels::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Refuels {
    Table,
    Id,
    VehicleNumber,
    FuelDate,
    FuelCard,
    PreviousMileage,
    CurrentMileage,
    DieselLiters,
    Currency,
    DieselPrice,
    DieselCost,
    FullTank,
    AdblueLiters,
    AdbluePrice,
    AdblueCost,
    Distance,
    AverageConsumption,
    TotalCost,
}
