use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum AeEvent {
    Table,
    Id,
    Title,
    StartDate,
    StartTime,
    EndDate,
    EndTime,
    Venue,
    Address,
    City,
    State,
    Zip,
    VirtualUrl,
    Capacity,
    WaitlistEnabled,
    RegistrationEnabled,
    RegistrationCloseAt,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum AeRegistration {
    Table,
    Id,
    EventId,
    Name,
    Email,
    Phone,
    Status,
    RegistrationDate,
    Meta,
    SearchName,
}
