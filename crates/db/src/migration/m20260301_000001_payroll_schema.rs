//! Payroll schema: employees, periods, records, facts, deductions.
//!
//! Written with the schema builder so the same migration runs on Postgres
//! and on the SQLite databases used by the test suite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn money(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .decimal_len(15, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn total(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .decimal_len(16, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn hours(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .decimal_len(8, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn count(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().default(0).to_owned()
}

fn created_at(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Employees::EmployeeCode)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employees::FullName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Employees::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(money(Employees::DailyRate))
                    .col(money(Employees::HourlyRate))
                    .col(
                        ColumnDef::new(Employees::OvertimeMultiplier)
                            .decimal_len(8, 4)
                            .not_null(),
                    )
                    .col(created_at(Employees::CreatedAt))
                    .col(created_at(Employees::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PayrollPeriods::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PayrollPeriods::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PayrollPeriods::Name).string_len(100).not_null())
                    .col(ColumnDef::new(PayrollPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(PayrollPeriods::EndDate).date().not_null())
                    .col(ColumnDef::new(PayrollPeriods::PayDate).date().not_null())
                    .col(count(PayrollPeriods::WorkingDays))
                    .col(
                        ColumnDef::new(PayrollPeriods::Status)
                            .string_len(16)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(PayrollPeriods::LockedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(PayrollPeriods::ClosedAt).timestamp_with_time_zone().null())
                    .col(count(PayrollPeriods::TotalEmployees))
                    .col(count(PayrollPeriods::PaidEmployees))
                    .col(total(PayrollPeriods::TotalGrossPay))
                    .col(total(PayrollPeriods::TotalDeductions))
                    .col(total(PayrollPeriods::TotalNetPay))
                    .col(created_at(PayrollPeriods::CreatedAt))
                    .col(created_at(PayrollPeriods::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payroll_periods_range")
                    .table(PayrollPeriods::Table)
                    .col(PayrollPeriods::StartDate)
                    .col(PayrollPeriods::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PayrollRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PayrollRecords::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PayrollRecords::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(PayrollRecords::PayrollPeriodId).uuid().not_null())
                    .col(money(PayrollRecords::DailyRate))
                    .col(money(PayrollRecords::HourlyRate))
                    .col(
                        ColumnDef::new(PayrollRecords::OvertimeMultiplier)
                            .decimal_len(8, 4)
                            .not_null(),
                    )
                    .col(count(PayrollRecords::DaysPresent))
                    .col(count(PayrollRecords::DaysAbsent))
                    .col(count(PayrollRecords::DaysLate))
                    .col(count(PayrollRecords::DaysHalfDay))
                    .col(hours(PayrollRecords::HoursWorked))
                    .col(count(PayrollRecords::LateMinutes))
                    .col(money(PayrollRecords::BasicPay))
                    .col(hours(PayrollRecords::OvertimeHours))
                    .col(money(PayrollRecords::OvertimePay))
                    .col(money(PayrollRecords::HolidayPay))
                    .col(money(PayrollRecords::NightDiffPay))
                    .col(money(PayrollRecords::Allowance))
                    .col(money(PayrollRecords::Bonus))
                    .col(money(PayrollRecords::GrossPay))
                    .col(money(PayrollRecords::Sss))
                    .col(money(PayrollRecords::Philhealth))
                    .col(money(PayrollRecords::PagIbig))
                    .col(money(PayrollRecords::Tax))
                    .col(money(PayrollRecords::Loan))
                    .col(money(PayrollRecords::Advance))
                    .col(money(PayrollRecords::OtherDeductions))
                    .col(money(PayrollRecords::DeductionsTotal))
                    .col(money(PayrollRecords::NetPay))
                    .col(money(PayrollRecords::AmountPaid))
                    .col(
                        ColumnDef::new(PayrollRecords::PaymentStatus)
                            .string_len(16)
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(ColumnDef::new(PayrollRecords::PaymentReference).string_len(100).null())
                    .col(
                        ColumnDef::new(PayrollRecords::ComputedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(PayrollRecords::PaidAt).timestamp_with_time_zone().null())
                    .col(created_at(PayrollRecords::CreatedAt))
                    .col(created_at(PayrollRecords::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payroll_records_employee")
                            .from(PayrollRecords::Table, PayrollRecords::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payroll_records_period")
                            .from(PayrollRecords::Table, PayrollRecords::PayrollPeriodId)
                            .to(PayrollPeriods::Table, PayrollPeriods::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one record per employee per period.
        manager
            .create_index(
                Index::create()
                    .name("uq_payroll_records_employee_period")
                    .table(PayrollRecords::Table)
                    .col(PayrollRecords::EmployeeId)
                    .col(PayrollRecords::PayrollPeriodId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payroll_records_period")
                    .table(PayrollRecords::Table)
                    .col(PayrollRecords::PayrollPeriodId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttendanceLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttendanceLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AttendanceLogs::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(AttendanceLogs::WorkDate).date().not_null())
                    .col(ColumnDef::new(AttendanceLogs::Status).string_len(16).not_null())
                    .col(hours(AttendanceLogs::HoursWorked))
                    .col(hours(AttendanceLogs::OvertimeHours))
                    .col(count(AttendanceLogs::LateMinutes))
                    .col(ColumnDef::new(AttendanceLogs::PayrollRecordId).uuid().null())
                    .col(created_at(AttendanceLogs::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_logs_employee")
                            .from(AttendanceLogs::Table, AttendanceLogs::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_logs_record")
                            .from(AttendanceLogs::Table, AttendanceLogs::PayrollRecordId)
                            .to(PayrollRecords::Table, PayrollRecords::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_logs_employee_date")
                    .table(AttendanceLogs::Table)
                    .col(AttendanceLogs::EmployeeId)
                    .col(AttendanceLogs::WorkDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OvertimeLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OvertimeLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(OvertimeLogs::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(OvertimeLogs::WorkDate).date().not_null())
                    .col(hours(OvertimeLogs::Hours))
                    .col(ColumnDef::new(OvertimeLogs::RateMultiplier).decimal_len(8, 4).null())
                    .col(ColumnDef::new(OvertimeLogs::Amount).decimal_len(15, 2).null())
                    .col(
                        ColumnDef::new(OvertimeLogs::ApprovalStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(OvertimeLogs::PayrollRecordId).uuid().null())
                    .col(created_at(OvertimeLogs::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_overtime_logs_employee")
                            .from(OvertimeLogs::Table, OvertimeLogs::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_overtime_logs_record")
                            .from(OvertimeLogs::Table, OvertimeLogs::PayrollRecordId)
                            .to(PayrollRecords::Table, PayrollRecords::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_overtime_logs_employee_date")
                    .table(OvertimeLogs::Table)
                    .col(OvertimeLogs::EmployeeId)
                    .col(OvertimeLogs::WorkDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Deductions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deductions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Deductions::PayrollRecordId).uuid().not_null())
                    .col(ColumnDef::new(Deductions::DeductionType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Deductions::Source)
                            .string_len(16)
                            .not_null()
                            .default("manual"),
                    )
                    .col(ColumnDef::new(Deductions::Amount).decimal_len(15, 2).not_null())
                    .col(
                        ColumnDef::new(Deductions::IsRecurring)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Deductions::Note).text().null())
                    .col(created_at(Deductions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deductions_record")
                            .from(Deductions::Table, Deductions::PayrollRecordId)
                            .to(PayrollRecords::Table, PayrollRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deductions_record")
                    .table(Deductions::Table)
                    .col(Deductions::PayrollRecordId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deductions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OvertimeLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PayrollRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PayrollPeriods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    EmployeeCode,
    FullName,
    Status,
    DailyRate,
    HourlyRate,
    OvertimeMultiplier,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PayrollPeriods {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
    PayDate,
    WorkingDays,
    Status,
    LockedAt,
    ClosedAt,
    TotalEmployees,
    PaidEmployees,
    TotalGrossPay,
    TotalDeductions,
    TotalNetPay,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PayrollRecords {
    Table,
    Id,
    EmployeeId,
    PayrollPeriodId,
    DailyRate,
    HourlyRate,
    OvertimeMultiplier,
    DaysPresent,
    DaysAbsent,
    DaysLate,
    DaysHalfDay,
    HoursWorked,
    LateMinutes,
    BasicPay,
    OvertimeHours,
    OvertimePay,
    HolidayPay,
    NightDiffPay,
    Allowance,
    Bonus,
    GrossPay,
    Sss,
    Philhealth,
    PagIbig,
    Tax,
    Loan,
    Advance,
    OtherDeductions,
    DeductionsTotal,
    NetPay,
    AmountPaid,
    PaymentStatus,
    PaymentReference,
    ComputedAt,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AttendanceLogs {
    Table,
    Id,
    EmployeeId,
    WorkDate,
    Status,
    HoursWorked,
    OvertimeHours,
    LateMinutes,
    PayrollRecordId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OvertimeLogs {
    Table,
    Id,
    EmployeeId,
    WorkDate,
    Hours,
    RateMultiplier,
    Amount,
    ApprovalStatus,
    PayrollRecordId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Deductions {
    Table,
    Id,
    PayrollRecordId,
    DeductionType,
    Source,
    Amount,
    IsRecurring,
    Note,
    CreatedAt,
}
