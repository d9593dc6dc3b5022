//! Clinic schema: patients, doctors, appointments and treatments.

use crate::schema::{EntityDescriptor, FieldDescriptor, Identifier, SchemaBinding};

pub static PACIENTE: EntityDescriptor = EntityDescriptor {
    name: "Paciente",
    resource: "pacientes",
    binding: SchemaBinding::Clinica,
    table: "paciente",
    identifier: Identifier::Serial { column: "id_paciente" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::text("direccion", "Dirección", 255),
        FieldDescriptor::text("telefono", "Teléfono", 15),
        FieldDescriptor::date("fecha_nacimiento", "Fecha de Nacimiento"),
        FieldDescriptor::long_text("historial_medico", "Historial Médico"),
    ],
};

pub static MEDICO: EntityDescriptor = EntityDescriptor {
    name: "Médico",
    resource: "medicos",
    binding: SchemaBinding::Clinica,
    table: "medico",
    identifier: Identifier::Serial { column: "id_medico" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::text("especialidad", "Especialidad", 100),
        FieldDescriptor::text("licencia_medica", "Licencia Médica", 50),
        FieldDescriptor::long_text("informacion_contacto", "Información de Contacto"),
    ],
};

pub static CITA: EntityDescriptor = EntityDescriptor {
    name: "Cita",
    resource: "citas",
    binding: SchemaBinding::Clinica,
    table: "cita",
    identifier: Identifier::Serial { column: "id_cita" },
    fields: &[
        FieldDescriptor::integer("id_paciente", "ID Paciente").references("paciente", "id_paciente"),
        FieldDescriptor::integer("id_medico", "ID Médico").references("medico", "id_medico"),
        FieldDescriptor::datetime("fecha_hora", "Fecha y Hora"),
        FieldDescriptor::long_text("motivo_visita", "Motivo de Visita"),
    ],
};

pub static TRATAMIENTO: EntityDescriptor = EntityDescriptor {
    name: "Tratamiento",
    resource: "tratamientos",
    binding: SchemaBinding::Clinica,
    table: "tratamiento",
    identifier: Identifier::Serial { column: "id_tratamiento" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::long_text("descripcion", "Descripción"),
        FieldDescriptor::decimal("costo", "Costo", 10, 2),
    ],
};

/// Referenced tables come before the tables pointing at them.
pub static ENTITIES: [&EntityDescriptor; 4] = [&PACIENTE, &MEDICO, &CITA, &TRATAMIENTO];
