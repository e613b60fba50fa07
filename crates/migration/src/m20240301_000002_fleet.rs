use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::VehicleNumber).string().not_null())
                    .col(ColumnDef::new(Vehicles::InsuranceNumber).string().not_null())
                    .col(ColumnDef::new(Vehicles::InsuranceExpiry).date().not_null())
                    .col(ColumnDef::new(Vehicles::InspectionExpiry).date().not_null())
                    .col(ColumnDef::new(Vehicles::TachographCalibration).date())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-vehicles-vehicle_number")
                    .table(Vehicles::Table)
                    .col(Vehicles::VehicleNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trailers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trailers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trailers::TrailerNumber).string().not_null())
                    .col(ColumnDef::new(Trailers::InsuranceNumber).string().not_null())
                    .col(ColumnDef::new(Trailers::InsuranceExpiry).date().not_null())
                    .col(ColumnDef::new(Trailers::InspectionExpiry).date().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-trailers-trailer_number")
                    .table(Trailers::Table)
                    .col(Trailers::TrailerNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trailers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Vehicles {
    Table,
    Id,
    VehicleNumber,
    InsuranceNumber,
    InsuranceExpiry,
    InspectionExpiry,
    TachographCalibration,
}

#[derive(Iden)]
pub enum Trailers {
    Table,
    Id,
    TrailerNumber,
    InsuranceNumber,
    InsuranceExpiry,
    InspectionExpiry,
}
